//! Architecture contract tests.

mod support;

use support::architecture::{find_lines_containing, find_non_export_lines_in_mod_files, read_relative};

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = find_lines_containing(
        "src/domain",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "crate::port",
            "tokio::",
            "alloy_provider",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn ports_depend_only_on_domain() {
    let hits = find_lines_containing(
        "src/port",
        &["crate::adapter", "crate::infrastructure", "crate::application"],
    );

    assert!(hits.is_empty(), "found outer-layer imports in ports: {hits:#?}");
}

#[test]
fn application_has_no_adapter_imports() {
    let hits = find_lines_containing(
        "src/application",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "alloy_provider",
            "alloy_signer_local",
            "dialoguer",
        ],
    );

    assert!(
        hits.is_empty(),
        "application layer reaches into adapters: {hits:#?}"
    );
}

#[test]
fn state_machine_is_runtime_free() {
    let hits = find_lines_containing("src/application/workflow/machine.rs", &["tokio", ".await"]);
    assert!(
        hits.is_empty(),
        "workflow machine must stay synchronous: {hits:#?}"
    );
}

#[test]
fn mod_rs_is_export_only() {
    let violations = find_non_export_lines_in_mod_files("src");
    assert!(
        violations.is_empty(),
        "found non-export content in mod.rs files: {violations:#?}"
    );
}

#[test]
fn testkit_is_feature_gated() {
    let source = read_relative("src/lib.rs");
    assert!(
        source.contains("#[cfg(any(test, feature = \"testkit\"))]\npub mod testkit;"),
        "testkit must only compile for tests or the testkit feature"
    );
}
