use dependents::core::{ArtifactIdentity, ArtifactKey, DependencyIndex, RegistryBuilder};
use dependents::model::{BinaryKind, BinaryRef, BinarySpec, ComponentSpec, ProjectModel};

fn lib(module: &str, name: &str) -> BinarySpec {
    BinarySpec::new(ArtifactIdentity::new(module, name, "debug"), BinaryKind::SharedLibrary)
}

fn key(module: &str, name: &str) -> ArtifactKey {
    ArtifactIdentity::new(module, name, "debug").key()
}

fn index_of(binaries: Vec<BinarySpec>) -> DependencyIndex {
    let mut model = ProjectModel::new();
    for binary in binaries {
        let module = binary.id.module_path().to_string();
        let component = ComponentSpec::new(binary.id.component()).with_binary(binary);
        model.add_component(module, component);
    }
    let registry = RegistryBuilder::new().build(&model).unwrap();
    DependencyIndex::build(&registry)
}

#[test]
fn every_registered_binary_has_an_entry() {
    let base = lib(":base", "base");
    let app = lib(":app", "app").with_dependency(base.to_ref());

    let index = index_of(vec![base, app]);

    assert_eq!(index.len(), 2);
    assert_eq!(index.dependencies_of(&key(":base", "base")), Some(&[][..]));
    assert_eq!(
        index.dependencies_of(&key(":app", "app")),
        Some(&[key(":base", "base")][..])
    );
    assert_eq!(index.dependencies_of(&key(":nope", "nope")), None);
}

#[test]
fn out_of_scope_dependencies_are_dropped() {
    let base = lib(":base", "base");
    let vendor = BinaryRef::new(
        ArtifactIdentity::new(":vendor", "zlib", "debug"),
        BinaryKind::PrebuiltLibrary,
    );
    let missing = BinaryRef::new(
        ArtifactIdentity::new(":elsewhere", "ghost", "debug"),
        BinaryKind::SharedLibrary,
    );
    let app = lib(":app", "app")
        .with_dependency(vendor)
        .with_dependency(base.to_ref())
        .with_dependency(missing);

    let index = index_of(vec![base, app]);

    assert_eq!(
        index.dependencies_of(&key(":app", "app")),
        Some(&[key(":base", "base")][..])
    );
    assert_eq!(index.edge_count(), 1);
}

#[test]
fn forward_order_follows_the_model() {
    let x = lib(":x", "x");
    let y = lib(":y", "y");
    let z = lib(":z", "z");
    let app = lib(":app", "app")
        .with_dependency(z.to_ref())
        .with_dependency(x.to_ref())
        .with_dependency(y.to_ref());

    let index = index_of(vec![x, y, z, app]);

    assert_eq!(
        index.dependencies_of(&key(":app", "app")).unwrap(),
        &[key(":z", "z"), key(":x", "x"), key(":y", "y")]
    );
}

#[test]
fn reverse_lookup_matches_linear_scan() {
    let core = lib(":core", "core");
    let net = lib(":net", "net").with_dependency(core.to_ref());
    let ui = lib(":ui", "ui").with_dependency(core.to_ref());
    let app = lib(":app", "app")
        .with_dependency(ui.to_ref())
        .with_dependency(core.to_ref())
        .with_dependency(net.to_ref());

    let index = index_of(vec![core, net, ui, app]);

    for target in [
        key(":core", "core"),
        key(":net", "net"),
        key(":ui", "ui"),
        key(":app", "app"),
    ] {
        assert_eq!(index.direct_dependents(&target), index.scan_dependents(&target));
    }

    // Registry order is by module path: :app, :core, :net, :ui
    let dependents: Vec<&str> = index
        .direct_dependents(&key(":core", "core"))
        .into_iter()
        .map(ArtifactKey::as_str)
        .collect();
    assert_eq!(dependents, vec![":app:app:debug", ":net:net:debug", ":ui:ui:debug"]);
}

#[test]
fn repeated_declaration_counts_once_for_dependents() {
    let base = lib(":base", "base");
    let app = lib(":app", "app")
        .with_dependency(base.to_ref())
        .with_dependency(base.to_ref());

    let index = index_of(vec![base, app]);

    assert_eq!(index.dependencies_of(&key(":app", "app")).unwrap().len(), 2);
    assert_eq!(index.direct_dependents(&key(":base", "base")).len(), 1);
    assert_eq!(index.scan_dependents(&key(":base", "base")).len(), 1);
}

#[test]
fn cycles_are_reported_in_registry_order() {
    let a = lib(":a", "a").with_dependency(BinaryRef::new(
        ArtifactIdentity::new(":b", "b", "debug"),
        BinaryKind::SharedLibrary,
    ));
    let b = lib(":b", "b").with_dependency(a.to_ref());
    let selfish = lib(":s", "s").with_dependency(BinaryRef::new(
        ArtifactIdentity::new(":s", "s", "debug"),
        BinaryKind::SharedLibrary,
    ));
    let plain = lib(":p", "p").with_dependency(a.to_ref());

    let index = index_of(vec![a, b, selfish, plain]);

    assert_eq!(
        index.cycles(),
        vec![vec![key(":a", "a"), key(":b", "b")], vec![key(":s", "s")]]
    );
}

#[test]
fn acyclic_index_has_no_cycles() {
    let base = lib(":base", "base");
    let app = lib(":app", "app").with_dependency(base.to_ref());
    assert!(index_of(vec![base, app]).cycles().is_empty());
}
