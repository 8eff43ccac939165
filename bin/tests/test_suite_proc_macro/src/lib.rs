use quote::{format_ident, quote};

/// Generates one test per `.lox` fixture below `bin/tests`. The first directory of a fixture's
/// path names the command it's run with, e.g. `parse/grouping.lox` runs `parse`.
#[proc_macro]
pub fn generate_tests(_: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let root_dir = format!("{}/..", env!("CARGO_MANIFEST_DIR"));
    let mut fixtures = walkdir::WalkDir::new(root_dir.clone())
        .into_iter()
        .flatten()
        .filter(|entry| entry.path().extension() == Some("lox".as_ref()))
        .map(|entry| {
            let test_file_path = entry.path().to_string_lossy().to_string();
            let relative_test_path =
                entry.path().strip_prefix(&root_dir).unwrap().to_string_lossy().to_string();
            (test_file_path, relative_test_path)
        })
        .collect::<Vec<_>>();
    fixtures.sort();

    let tests = fixtures.iter().map(|(test_file_path, relative_test_path)| {
        let command = relative_test_path.split('/').next().unwrap().to_string();
        let test_ident =
            format_ident!("test_{}", relative_test_path.replace('/', "_").replace(".lox", ""));
        quote! {
            #[test]
            fn #test_ident() {
                lox_expect(#command, std::fs::read_to_string(#test_file_path).unwrap().as_str());
            }
        }
    });

    quote! {
        #[ctor::ctor]
        fn init() {
            env_logger::init();
        }

        #(#tests)*
    }
    .into()
}
