//! The house scene as a fixed table of placed meshes
//!
//! Each row is one draw. Values are hand-authored scene content and are replayed
//! verbatim every frame.

use crate::gfx::geometry::MeshKind;
use crate::gfx::transform::Placement;

/// One drawn mesh with its placement and surface settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenePiece {
    pub name: &'static str,
    pub mesh: MeshKind,
    pub placement: Placement,
    pub color: [f32; 4],
    pub texture: Option<&'static str>,
    pub uv_scale: Option<[f32; 2]>,
    pub material: Option<&'static str>,
}

const GREY: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
const TAN: [f32; 4] = [0.8, 0.5, 0.3, 1.0];

const fn piece(
    name: &'static str,
    mesh: MeshKind,
    placement: Placement,
    color: [f32; 4],
    texture: &'static str,
    uv_scale: [f32; 2],
    material: &'static str,
) -> ScenePiece {
    ScenePiece {
        name,
        mesh,
        placement,
        color,
        texture: Some(texture),
        uv_scale: Some(uv_scale),
        material: Some(material),
    }
}

const fn at(scale: [f32; 3], x_degrees: f32, position: [f32; 3]) -> Placement {
    Placement::new(scale, [x_degrees, 0.0, 0.0], position)
}

const fn column_base(name: &'static str, x: f32) -> ScenePiece {
    piece(
        name,
        MeshKind::Box,
        at([1.0, 0.5, 1.0], 0.0, [x, 0.25, 3.0]),
        [0.25, 0.17, 0.07, 1.0],
        "wood",
        [1.0, 0.5],
        "wood",
    )
}

const fn column_pillar(name: &'static str, x: f32) -> ScenePiece {
    piece(
        name,
        MeshKind::TaperedCylinder,
        at([0.3, 3.0, 0.3], 0.0, [x, 0.5, 3.0]),
        [0.4, 0.2, 0.1, 1.0],
        "wood",
        [1.8, 3.0],
        "wood",
    )
}

#[rustfmt::skip]
pub const HOUSE_SCENE: [ScenePiece; 27] = [
    piece("ground", MeshKind::Plane, at([20.0, 1.0, 10.0], 0.0, [0.0, 0.0, 0.0]), GREY, "grass", [1.0, 1.0], "metal"),
    ScenePiece {
        name: "backdrop",
        mesh: MeshKind::Plane,
        placement: at([20.0, 1.0, 10.0], 90.0, [0.0, 9.0, -10.0]),
        color: [0.55, 0.55, 0.55, 1.0],
        texture: None,
        uv_scale: None,
        material: Some("metal"),
    },
    column_base("support column 1 base", 6.75),
    column_pillar("support column 1", 6.75),
    column_base("support column 2 base", 4.75),
    column_pillar("support column 2", 4.75),
    column_base("support column 3 base", 0.25),
    column_pillar("support column 3", 0.25),
    column_base("support column 4 base", -2.0),
    column_pillar("support column 4", -2.0),
    piece("horizontal beam", MeshKind::Box, at([10.0, 0.5, 1.0], 0.0, [2.25, 3.75, 3.0]), TAN, "roof", [8.0, 1.0], "wood"),
    piece("house body left", MeshKind::Box, at([15.0, 3.5, 8.0], 0.0, [-10.25, 1.85, -4.5]), TAN, "outergreen", [4.0, 1.0], "wood"),
    piece("house body right", MeshKind::Box, at([7.0, 3.5, 8.0], 0.0, [4.25, 1.5, -4.5]), TAN, "brick", [8.0, 1.0], "wood"),
    piece("porch walkway", MeshKind::Box, at([3.75, 0.1, 15.5], 0.0, [-1.0, 0.0, 2.2]), TAN, "concrete", [1.0, 1.0], "wood"),
    piece("porch right side", MeshKind::Box, at([9.75, 0.1, 5.25], 0.0, [2.9, 0.0, 0.95]), TAN, "concrete", [1.0, 1.0], "wood"),
    piece("front door", MeshKind::Box, at([3.75, 3.4, 4.0], 0.0, [-1.0, 1.95, -6.45]), TAN, "door", [1.0, 1.0], "wood"),
    piece("upper house body", MeshKind::Box, at([25.5, 3.5, 5.0], 0.0, [-5.0, 5.35, -6.0]), TAN, "wall", [8.0, 1.0], "wood"),
    piece("upper left gable", MeshKind::Prism, at([3.0, 3.0, 3.0], 270.0, [-16.25, 5.0, -2.0]), TAN, "outergreen", [1.0, 1.0], "wood"),
    piece("upper roof", MeshKind::Plane, at([13.0, 2.5, 4.0], 0.0, [-5.0, 7.25, -6.0]), TAN, "roof", [8.0, 1.0], "wood"),
    piece("second upper gable", MeshKind::Prism, at([3.0, 3.0, 3.0], 270.0, [-4.25, 5.0, -2.0]), TAN, "outergreen", [1.0, 1.0], "wood"),
    piece("second story window 1", MeshKind::Plane, at([2.0, 1.0, 1.0], 90.0, [-10.0, 5.25, -3.0]), GREY, "window", [1.0, 1.0], "metal"),
    piece("second story window 2", MeshKind::Plane, at([2.0, 1.0, 1.0], 90.0, [3.0, 5.25, -3.0]), GREY, "window", [1.0, 1.0], "metal"),
    piece("first story window", MeshKind::Plane, at([2.0, 1.0, 1.0], 90.0, [4.0, 2.0, 0.0]), GREY, "window", [1.0, 1.0], "metal"),
    piece("garage door", MeshKind::Plane, at([5.5, 1.0, 1.5], 90.0, [-10.0, 1.75, 0.0]), GREY, "garage", [0.0, 1.0], "metal"),
    piece("first story roof left", MeshKind::Plane, at([8.0, 1.0, 4.0], 0.0, [-10.75, 3.7, -4.25]), TAN, "roof", [4.0, 1.0], "wood"),
    piece("first story roof right", MeshKind::Plane, at([5.0, 1.0, 5.0], 0.0, [2.25, 3.5, -1.75]), TAN, "roof", [8.0, 1.0], "wood"),
    piece("driveway", MeshKind::Plane, at([5.5, 1.0, 7.0], 0.0, [-10.0, 0.01, 3.0]), GREY, "concrete", [1.0, 1.0], "metal"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_piece_references_known_assets() {
        let textures = [
            "brick", "wood", "wall", "grass", "cement", "beam", "door", "outergreen", "concrete",
            "roof", "window", "garage",
        ];
        for piece in HOUSE_SCENE.iter() {
            if let Some(tag) = piece.texture {
                assert!(textures.contains(&tag), "{} uses unknown texture {}", piece.name, tag);
            }
            if let Some(tag) = piece.material {
                assert!(tag == "metal" || tag == "wood", "{} uses {}", piece.name, tag);
            }
        }
    }

    #[test]
    fn only_the_backdrop_is_untextured() {
        let untextured: Vec<&str> = HOUSE_SCENE
            .iter()
            .filter(|piece| piece.texture.is_none())
            .map(|piece| piece.name)
            .collect();
        assert_eq!(untextured, vec!["backdrop"]);
    }

    #[test]
    fn pyramid_is_never_drawn() {
        assert!(HOUSE_SCENE.iter().all(|piece| piece.mesh != MeshKind::Pyramid3));
        assert_eq!(HOUSE_SCENE.iter().filter(|p| p.mesh == MeshKind::Prism).count(), 2);
    }

    fn piece_named(name: &str) -> ScenePiece {
        HOUSE_SCENE
            .iter()
            .copied()
            .find(|piece| piece.name == name)
            .unwrap_or_else(|| panic!("no piece named {}", name))
    }

    #[test]
    fn garage_door_keeps_its_flat_horizontal_uv_scale() {
        let garage = piece_named("garage door");
        assert_eq!(garage.texture, Some("garage"));
        assert_eq!(garage.uv_scale, Some([0.0, 1.0]));
        assert_eq!(garage.placement.rotation_degrees, [90.0, 0.0, 0.0]);
    }

    #[test]
    fn gables_are_prisms_stood_up_on_x() {
        for name in ["upper left gable", "second upper gable"] {
            let gable = piece_named(name);
            assert_eq!(gable.mesh, MeshKind::Prism);
            assert_eq!(gable.placement.rotation_degrees, [270.0, 0.0, 0.0]);
            assert_eq!(gable.placement.scale, [3.0, 3.0, 3.0]);
        }
    }

    #[test]
    fn driveway_sits_just_above_the_ground() {
        let driveway = piece_named("driveway");
        assert_eq!(driveway.placement.position, [-10.0, 0.01, 3.0]);
        assert_eq!(piece_named("ground").placement.position[1], 0.0);
        assert_eq!(HOUSE_SCENE.last().map(|piece| piece.name), Some("driveway"));
    }

    #[test]
    fn columns_stand_on_their_bases() {
        let pairs = HOUSE_SCENE[2..10].chunks(2);
        for pair in pairs {
            let (base, pillar) = (&pair[0], &pair[1]);
            assert_eq!(base.mesh, MeshKind::Box);
            assert_eq!(pillar.mesh, MeshKind::TaperedCylinder);
            assert_eq!(base.placement.position[0], pillar.placement.position[0]);
            // Box is centred, so its top is at y + half height
            let base_top = base.placement.position[1] + base.placement.scale[1] / 2.0;
            assert_eq!(base_top, pillar.placement.position[1]);
        }
    }
}
