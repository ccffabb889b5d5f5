use insta::assert_snapshot;
use textpatch::app::patch::Patcher;
use textpatch::app::report::render_diff;
use textpatch::domain::model::PatchSpec;
use textpatch::infra::memory::MemoryResource;

#[test]
fn dry_run_diff_renders() {
    let original = "<div>\n  <span>M</span>\n</div>\n";
    let spec = PatchSpec::new(
        "Home.tsx",
        "  <span>M</span>\n",
        "  <video src=\"/max.mp4\" />\n",
    );
    let mut resource = MemoryResource::new("Home.tsx", original);

    let report = Patcher::new()
        .dry_run(true)
        .patch_resource(&spec, &mut resource)
        .expect("dry run succeeds");

    assert_snapshot!("dry_run_diff", render_diff(&report));
}
