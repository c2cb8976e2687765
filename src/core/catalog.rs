//! Bundled module catalog for the Voxel plugin.
//!
//! Mirrors the plugin's module descriptors: ten modules layered on top of
//! engine built-ins, with editor tooling split into editor-only modules and
//! editor hooks in runtime modules gated on the `editor` capability.

use std::path::PathBuf;

use crate::core::build_options::{BuildOptions, PchUsage};
use crate::core::descriptor::{ModuleDescriptor, ModuleKind, Visibility};
use crate::core::manifest::{Manifest, PluginSection};
use crate::core::module_id::ModuleId;
use crate::core::predicate::Predicate;

/// Engine modules the plugin links against.
const ENGINE_MODULES: &[&str] = &[
    // Runtime
    "Core",
    "CoreUObject",
    "Engine",
    "ApplicationCore",
    "DeveloperSettings",
    "Projects",
    "TraceLog",
    "RenderCore",
    "RHI",
    "Renderer",
    "PhysicsCore",
    "Chaos",
    "GeometryCore",
    "MeshDescription",
    "StaticMeshDescription",
    "AssetRegistry",
    "Landscape",
    "Slate",
    "SlateCore",
    "UMG",
    "HTTP",
    "Json",
    "JsonUtilities",
    // Editor
    "UnrealEd",
    "MessageLog",
    "ToolMenus",
    "EditorStyle",
    "PropertyEditor",
    "AssetTools",
    "AdvancedPreviewScene",
    "GraphEditor",
    "BlueprintGraph",
    "Kismet",
    "KismetCompiler",
    "KismetWidgets",
    "LandscapeEditor",
    "ContentBrowser",
    "DesktopPlatform",
];

/// `<Module>/Public` exported, `<Module>/Private` internal.
fn source_layout(name: &str) -> BuildOptions {
    BuildOptions {
        public_include_paths: vec![PathBuf::from(format!("{}/Public", name))],
        private_include_paths: vec![PathBuf::from(format!("{}/Private", name))],
        ..Default::default()
    }
}

fn runtime(name: &str) -> ModuleDescriptor {
    ModuleDescriptor::new(name).with_build_options(source_layout(name))
}

fn editor(name: &str) -> ModuleDescriptor {
    runtime(name).with_kind(ModuleKind::Editor)
}

/// The Voxel plugin's modules in declaration order.
pub fn voxel_modules() -> Vec<ModuleDescriptor> {
    let core_options = BuildOptions {
        pch: PchUsage::ExplicitOrShared,
        private_pch_header: Some(PathBuf::from("VoxelCore/Public/VoxelMinimal.h")),
        shared_pch_header: Some(PathBuf::from("VoxelCore/Public/VoxelCoreMinimal.h")),
        ..source_layout("VoxelCore")
    };

    vec![
        ModuleDescriptor::new("VoxelCore")
            .with_build_options(core_options)
            .public(["Core", "CoreUObject", "Engine", "DeveloperSettings", "TraceLog"])
            .private([
                "Projects",
                "ApplicationCore",
                "RenderCore",
                "RHI",
                "Renderer",
                "Slate",
                "SlateCore",
                "PhysicsCore",
                "Chaos",
            ])
            .when(Predicate::editor(), Visibility::Private, ["UnrealEd", "MessageLog"]),
        runtime("VoxelCoreAssets")
            .public(["VoxelCore"])
            .private([
                "Core",
                "CoreUObject",
                "Engine",
                "RenderCore",
                "MeshDescription",
                "StaticMeshDescription",
                "AssetRegistry",
            ]),
        runtime("VoxelGraphCore")
            .public(["VoxelCore", "VoxelCoreAssets"])
            .private([
                "Core",
                "CoreUObject",
                "Engine",
                "RenderCore",
                "RHI",
                "Renderer",
                "PhysicsCore",
                "Chaos",
                "GeometryCore",
            ])
            .when(Predicate::editor(), Visibility::Private, ["UnrealEd", "MessageLog"]),
        runtime("VoxelLandscape")
            .public(["VoxelCore", "VoxelGraphCore"])
            .private(["VoxelCoreAssets", "Landscape", "RenderCore", "RHI", "Renderer"])
            .when(Predicate::editor(), Visibility::Private, ["UnrealEd"]),
        runtime("VoxelBlueprint")
            .with_kind(ModuleKind::UncookedOnly)
            .public(["VoxelCore", "VoxelGraphCore"])
            .private([
                "BlueprintGraph",
                "KismetCompiler",
                "Kismet",
                "UnrealEd",
                "Slate",
                "SlateCore",
            ]),
        editor("VoxelCoreAssetsEditor").private([
            "VoxelCore",
            "VoxelCoreAssets",
            "VoxelGraphCore",
            "UnrealEd",
            "Slate",
            "SlateCore",
            "PropertyEditor",
            "AssetTools",
            "AdvancedPreviewScene",
        ]),
        editor("VoxelGraphEditor")
            .public(["VoxelGraphCore"])
            .private([
                "VoxelCore",
                "VoxelCoreAssets",
                "ApplicationCore",
                "GraphEditor",
                "Kismet",
                "KismetWidgets",
                "UnrealEd",
                "Slate",
                "SlateCore",
                "UMG",
                "ToolMenus",
                "EditorStyle",
                "PropertyEditor",
                "AssetTools",
                "MessageLog",
            ]),
        editor("VoxelLandscapeEditor").private([
            "VoxelCore",
            "VoxelGraphCore",
            "VoxelLandscape",
            "Landscape",
            "LandscapeEditor",
            "UnrealEd",
            "Slate",
            "SlateCore",
        ]),
        editor("VoxelBlueprintEditor").private([
            "VoxelCore",
            "VoxelGraphCore",
            "VoxelBlueprint",
            "VoxelGraphEditor",
            "BlueprintGraph",
            "Kismet",
            "KismetCompiler",
            "GraphEditor",
            "UnrealEd",
            "Slate",
            "SlateCore",
            "PropertyEditor",
        ]),
        editor("VoxelContentEditor").private([
            "VoxelCore",
            "Projects",
            "HTTP",
            "Json",
            "JsonUtilities",
            "ContentBrowser",
            "DesktopPlatform",
            "UnrealEd",
            "ToolMenus",
            "EditorStyle",
            "Slate",
            "SlateCore",
        ]),
    ]
}

/// The whole plugin as a manifest.
pub fn voxel_plugin() -> Manifest {
    Manifest {
        plugin: PluginSection {
            name: Some("Voxel".to_string()),
            externals: ENGINE_MODULES.iter().map(ModuleId::new).collect(),
        },
        modules: voxel_modules(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::flags::{BuildFlags, IncludeHygiene};
    use crate::resolver::resolve;
    use crate::test_support::{names, order_names};

    #[test]
    fn test_registers_cleanly() {
        let registry = voxel_plugin().to_registry(&[]).unwrap();
        assert_eq!(registry.len(), 10);
        registry.validate(&BuildFlags::default()).unwrap();
        registry.validate(&BuildFlags::editor()).unwrap();
    }

    #[test]
    fn test_editor_build_resolves_everything() {
        let registry = voxel_plugin().to_registry(&[]).unwrap();
        let flags = BuildFlags::editor();

        let plan = resolve(&registry, &registry.default_entries(&flags), &flags).unwrap();
        let order = order_names(&plan);
        assert_eq!(order.len(), 10);
        assert_eq!(order[0], "VoxelCore");

        let pos = |n: &str| order.iter().position(|m| *m == n).unwrap();
        assert!(pos("VoxelGraphCore") < pos("VoxelLandscape"));
        assert!(pos("VoxelGraphEditor") < pos("VoxelBlueprintEditor"));
        assert!(pos("VoxelBlueprint") < pos("VoxelBlueprintEditor"));
        assert!(names(plan.externals()).contains(&"UnrealEd"));
    }

    #[test]
    fn test_game_build_has_no_editor_modules() {
        let registry = voxel_plugin().to_registry(&[]).unwrap();
        let flags = BuildFlags::default();

        let plan = resolve(&registry, &registry.default_entries(&flags), &flags).unwrap();
        assert_eq!(
            order_names(&plan),
            vec!["VoxelCore", "VoxelCoreAssets", "VoxelGraphCore", "VoxelLandscape"]
        );

        let externals = names(plan.externals());
        for editor_only in ["UnrealEd", "MessageLog", "GraphEditor", "KismetCompiler"] {
            assert!(!externals.contains(&editor_only), "{} leaked", editor_only);
        }
    }

    #[test]
    fn test_landscape_sees_graph_core_interface() {
        let registry = voxel_plugin().to_registry(&[]).unwrap();
        let flags = BuildFlags::default().with_hygiene(IncludeHygiene::Iwyu);
        let plan = resolve(&registry, &[ModuleId::new("VoxelLandscape")], &flags).unwrap();

        let visible = names(&plan.visible_modules(ModuleId::new("VoxelLandscape")));
        assert!(visible.contains(&"VoxelCoreAssets"));
        assert!(visible.contains(&"Engine"));
        // Private dependency of VoxelCore
        assert!(!visible.contains(&"Chaos"));

        let core = plan.settings(ModuleId::new("VoxelCore")).unwrap();
        assert_eq!(core.pch, PchUsage::ExplicitOrShared);
        assert_eq!(
            core.private_pch_header,
            Some(PathBuf::from("VoxelCore/Public/VoxelMinimal.h"))
        );
    }

    #[test]
    fn test_voxel_core_keeps_source_layout_and_pch() {
        let modules = voxel_modules();
        let core = &modules[0];
        assert_eq!(core.name.as_str(), "VoxelCore");
        assert_eq!(core.kind, ModuleKind::Runtime);

        let options = &core.build_options;
        assert_eq!(options.pch, PchUsage::ExplicitOrShared);
        assert_eq!(
            options.public_include_paths,
            vec![PathBuf::from("VoxelCore/Public")]
        );
        assert_eq!(
            options.private_include_paths,
            vec![PathBuf::from("VoxelCore/Private")]
        );
        assert_eq!(
            options.shared_pch_header,
            Some(PathBuf::from("VoxelCore/Public/VoxelCoreMinimal.h"))
        );
    }
}
