#[test]
fn mcq_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/mcq_error_pass.rs");
    t.pass("tests/ui/mcq_error_status_pass.rs");
}
