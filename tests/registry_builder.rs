use anyhow::Result;
use dependents::core::{ArtifactIdentity, RegistryBuilder};
use dependents::model::{
    BinaryKind, BinarySpec, ComponentSpec, ModuleHandle, ProjectModel, ProjectModelProvider,
};

fn binary(module: &str, component: &str, variant: &str, kind: BinaryKind) -> BinarySpec {
    BinarySpec::new(ArtifactIdentity::new(module, component, variant), kind)
}

#[test]
fn modules_are_visited_in_path_order() {
    let mut model = ProjectModel::new();
    model.add_component(
        ":zeta",
        ComponentSpec::new("app")
            .with_binary(binary(":zeta", "app", "debug", BinaryKind::Executable)),
    );
    model.add_component(
        ":alpha",
        ComponentSpec::new("core")
            .with_binary(binary(":alpha", "core", "debug", BinaryKind::SharedLibrary))
            .with_binary(binary(":alpha", "core", "release", BinaryKind::StaticLibrary)),
    );
    model.add_component(
        "",
        ComponentSpec::new("tool")
            .with_binary(binary("", "tool", "debug", BinaryKind::Executable)),
    );

    let registry = RegistryBuilder::new().build(&model).unwrap();

    let keys: Vec<&str> = registry.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "::tool:debug",
            ":alpha:core:debug",
            ":alpha:core:release",
            ":zeta:app:debug",
        ]
    );
}

#[test]
fn non_native_binaries_are_skipped() {
    let mut model = ProjectModel::new();
    model.add_component(
        ":mixed",
        ComponentSpec::new("lib")
            .with_binary(binary(":mixed", "lib", "native", BinaryKind::SharedLibrary))
            .with_binary(binary(":mixed", "lib", "jar", BinaryKind::Jvm))
            .with_binary(binary(":mixed", "lib", "vendor", BinaryKind::PrebuiltLibrary)),
    );

    let registry = RegistryBuilder::new().build(&model).unwrap();

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.skipped(), 2);
    let key = ArtifactIdentity::new(":mixed", "lib", "native").key();
    assert!(registry.contains(&key));
}

#[test]
fn colliding_key_keeps_position_and_takes_later_value() {
    let mut model = ProjectModel::new();
    model.add_component(
        ":a",
        ComponentSpec::new("lib")
            .with_binary(binary(":a", "lib", "debug", BinaryKind::SharedLibrary))
            .with_binary(binary(":a", "lib", "release", BinaryKind::SharedLibrary)),
    );
    model.add_component(
        ":a",
        ComponentSpec::new("lib").with_binary(
            binary(":a", "lib", "debug", BinaryKind::SharedLibrary).with_buildable(false),
        ),
    );

    let registry = RegistryBuilder::new().build(&model).unwrap();

    assert_eq!(registry.len(), 2);
    let (first_key, first) = registry.get_index(0).unwrap();
    assert_eq!(first_key.as_str(), ":a:lib:debug");
    assert!(!first.buildable);
}

#[test]
fn empty_model_builds_empty_registry() {
    let model = ProjectModel::new();
    let registry = RegistryBuilder::new().build(&model).unwrap();
    assert!(registry.is_empty());
}

struct FailingProvider;

impl ProjectModelProvider for FailingProvider {
    fn enumerate_modules(&self) -> Vec<ModuleHandle> {
        vec![ModuleHandle::new(":broken")]
    }

    fn realized_components(&self, module: &ModuleHandle) -> Result<Vec<ComponentSpec>> {
        anyhow::bail!("cannot realize {}", module)
    }
}

#[test]
fn provider_failure_is_propagated() {
    let err = RegistryBuilder::new().build(&FailingProvider).unwrap_err();
    assert!(err.to_string().contains(":broken"));
}
