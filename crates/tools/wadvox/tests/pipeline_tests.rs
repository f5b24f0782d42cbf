//! Drives the whole pipeline over a synthetic WAD.

use wad::{Wad, WadCollection};
use wadvox::config::Corrections;
use wadvox::pipeline::{self, Target};
use wadvox::rotation::{self, RotationError};

/// Builds an archive from (name, body) pairs.
fn wad_bytes(lumps: &[(String, Vec<u8>)]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"PWAD");
    data.extend_from_slice(&(lumps.len() as u32).to_le_bytes());

    let mut payload = Vec::new();
    let mut entries = Vec::new();
    for (_, body) in lumps {
        entries.push(((12 + payload.len()) as u32, body.len() as u32));
        payload.extend_from_slice(body);
    }
    data.extend_from_slice(&((12 + payload.len()) as u32).to_le_bytes());
    data.extend_from_slice(&payload);

    for ((name, _), (offset, size)) in lumps.iter().zip(&entries) {
        data.extend_from_slice(&offset.to_le_bytes());
        data.extend_from_slice(&size.to_le_bytes());
        let mut bytes = [0u8; 8];
        bytes[..name.len()].copy_from_slice(name.as_bytes());
        data.extend_from_slice(&bytes);
    }
    data
}

/// Encodes a picture lump with one single-pixel post per listed pixel.
fn picture_bytes(
    width: u16,
    height: u16,
    left: i16,
    top: i16,
    pixels: &[(u16, u16, u8)],
) -> Vec<u8> {
    let mut columns: Vec<Vec<(u16, u8)>> = vec![Vec::new(); width as usize];
    for &(x, y, c) in pixels {
        columns[x as usize].push((y, c));
    }

    let mut data = Vec::new();
    data.extend_from_slice(&width.to_le_bytes());
    data.extend_from_slice(&height.to_le_bytes());
    data.extend_from_slice(&left.to_le_bytes());
    data.extend_from_slice(&top.to_le_bytes());

    let table_at = data.len();
    data.extend(std::iter::repeat(0u8).take(width as usize * 4));
    for (x, column) in columns.iter().enumerate() {
        let offset = data.len() as u32;
        data[table_at + x * 4..table_at + x * 4 + 4].copy_from_slice(&offset.to_le_bytes());
        for &(y, c) in column {
            data.extend_from_slice(&[y as u8, 1, 0, c, 0]);
        }
        data.push(0xFF);
    }
    data
}

fn palette_bytes() -> Vec<u8> {
    (0..768).map(|i| (i % 256) as u8).collect()
}

fn block_pixels(color: u8) -> Vec<(u16, u16, u8)> {
    (0..4)
        .flat_map(|x| (0..4).map(move |y| (x, y, color)))
        .collect()
}

fn collection_from(lumps: &[(String, Vec<u8>)], dir: &std::path::Path) -> WadCollection {
    let path = dir.join("test.wad");
    std::fs::write(&path, wad_bytes(lumps)).unwrap();
    let mut collection = WadCollection::new();
    collection.push(Wad::load(&path).unwrap());
    collection
}

fn sprite_lumps(base: &str) -> Vec<(String, Vec<u8>)> {
    let mut lumps = vec![
        ("PLAYPAL".to_string(), palette_bytes()),
        ("S_START".to_string(), Vec::new()),
    ];
    for r in 1..=8u8 {
        lumps.push((
            format!("{base}A{r}"),
            picture_bytes(4, 4, 2, 10, &block_pixels(10 + r)),
        ));
    }
    lumps.push(("S_END".to_string(), Vec::new()));
    lumps
}

#[test]
fn converts_a_frame_into_a_readable_model() {
    let dir = tempfile::tempdir().unwrap();
    let wads = collection_from(&sprite_lumps("TSTA"), dir.path());
    let palette = pipeline::load_palette(&wads).unwrap();

    let targets = [Target {
        sprite: "TSTA".to_string(),
        frame: 'A',
    }];
    let written = pipeline::convert_all(
        &wads,
        &palette,
        &Corrections::builtin(),
        &targets,
        dir.path(),
        false,
    )
    .unwrap();

    assert_eq!(written.len(), 1);
    assert_eq!(
        written[0].file_name().unwrap().to_str().unwrap(),
        "mdl-TSTAA.vox"
    );

    let parsed = dot_vox::load_bytes(&std::fs::read(&written[0]).unwrap()).unwrap();
    let model = &parsed.models[0];
    assert_eq!((model.size.x, model.size.y, model.size.z), (256, 256, 256));
    assert!(!model.voxels.is_empty());
    // A 4x4 silhouette carves a blob hugging the volume center, and the
    // reader hands its colors back as the rotation pixels' palette
    // indices.
    assert!(model
        .voxels
        .iter()
        .any(|v| (v.x, v.y, v.z) == (128, 128, 128)));
    for v in &model.voxels {
        assert!((124..=132).contains(&v.x));
        assert!((124..=132).contains(&v.y));
        assert!((11..=18).contains(&v.i));
    }
}

#[test]
fn mirrored_lumps_complete_and_flip_rotations() {
    let pixels = vec![(0, 0, 1), (2, 0, 3)];
    let picture = picture_bytes(3, 1, 1, 20, &pixels);
    let mut lumps = vec![
        ("PLAYPAL".to_string(), palette_bytes()),
        ("S_START".to_string(), Vec::new()),
    ];
    for name in ["TSTCA1", "TSTCA2A8", "TSTCA3A7", "TSTCA4A6", "TSTCA5"] {
        lumps.push((name.to_string(), picture.clone()));
    }
    lumps.push(("S_END".to_string(), Vec::new()));

    let dir = tempfile::tempdir().unwrap();
    let wads = collection_from(&lumps, dir.path());

    let set = rotation::build_views(&wads, "TSTC", 'A', &Corrections::default()).unwrap();
    for view in &set.views {
        assert_eq!((view.width(), view.height()), (3, 1));
    }

    // Rotation 2 is stored as-is, rotation 8 is its mirror.
    assert_eq!(set.views[1].get(0, 0), 1);
    assert_eq!(set.views[1].get(2, 0), 3);
    assert_eq!(set.views[7].get(0, 0), 3);
    assert_eq!(set.views[7].get(2, 0), 1);
    assert!(set.views[1].is_transparent(1, 0));
    assert!(set.views[7].is_transparent(1, 0));
}

#[test]
fn reports_missing_rotations_by_number() {
    let mut lumps = vec![
        ("PLAYPAL".to_string(), palette_bytes()),
        ("S_START".to_string(), Vec::new()),
    ];
    for r in 1..=6u8 {
        lumps.push((
            format!("TSTDA{r}"),
            picture_bytes(2, 2, 1, 1, &[(0, 0, 4)]),
        ));
    }
    lumps.push(("S_END".to_string(), Vec::new()));

    let dir = tempfile::tempdir().unwrap();
    let wads = collection_from(&lumps, dir.path());

    let err = rotation::build_views(&wads, "TSTD", 'A', &Corrections::default()).unwrap_err();
    assert!(matches!(err, RotationError::Incomplete { .. }));
    let message = err.to_string();
    assert!(message.contains("missing rotations 7, 8"), "{message}");
}

#[test]
fn corrections_shift_individual_rotations() {
    let mut lumps = vec![
        ("PLAYPAL".to_string(), palette_bytes()),
        ("S_START".to_string(), Vec::new()),
    ];
    for r in 1..=8u8 {
        lumps.push((
            format!("TSTEA{r}"),
            picture_bytes(1, 1, 0, 0, &[(0, 0, 5)]),
        ));
    }
    lumps.push(("S_END".to_string(), Vec::new()));

    let dir = tempfile::tempdir().unwrap();
    let wads = collection_from(&lumps, dir.path());

    let config = dir.path().join("corrections.toml");
    std::fs::write(
        &config,
        "[corrections.TSTEA]\n\
         rotations = [[0, 5], [0, 0], [0, 0], [0, 0], [0, 0], [0, 0], [0, 0], [0, 0]]\n",
    )
    .unwrap();
    let mut corrections = Corrections::default();
    corrections.extend(Corrections::load(&config).unwrap());

    let set = rotation::build_views(&wads, "TSTE", 'A', &corrections).unwrap();
    // Rotation 1 hangs five rows higher, stretching the shared window.
    assert_eq!((set.views[0].width(), set.views[0].height()), (1, 6));
    assert_eq!(set.views[0].get(0, 0), 5);
    assert!(set.views[0].is_transparent(0, 5));
    assert_eq!(set.views[1].get(0, 5), 5);
    assert!(set.views[1].is_transparent(0, 0));
}

#[test]
fn dump_frames_writes_one_canvas_per_rotation() {
    let dir = tempfile::tempdir().unwrap();
    let wads = collection_from(&sprite_lumps("TSTA"), dir.path());
    let palette = pipeline::load_palette(&wads).unwrap();

    let target = Target {
        sprite: "TSTA".to_string(),
        frame: 'A',
    };
    pipeline::convert_frame(
        &wads,
        &palette,
        &voxel::CameraRig::new(),
        &Corrections::builtin(),
        &target,
        dir.path(),
        true,
    )
    .unwrap();

    for r in 1..=8 {
        let path = dir.path().join(format!("fr-TSTAA{r}.png"));
        assert!(path.exists(), "missing {}", path.display());
    }
    assert!(dir.path().join("mdl-TSTAA.vox").exists());
}
