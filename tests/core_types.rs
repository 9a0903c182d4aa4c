use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use texsearch::{
    glcm_signature, CoOccurrenceMatrix, DescriptorKind, GlcmConfig, GrayImage, Offset,
    TexSearchError, TextureSignature,
};

fn random_image(rng: &mut StdRng, width: usize, height: usize, levels: usize) -> GrayImage {
    let data = (0..width * height)
        .map(|_| rng.random_range(0..levels) as u8)
        .collect();
    GrayImage::with_levels(data, width, height, levels).unwrap()
}

#[test]
fn gray_image_rejects_zero_area() {
    let err = GrayImage::new(Vec::new(), 0, 4).unwrap_err();
    assert_eq!(err, TexSearchError::InvalidImage { width: 0, height: 4 });

    let err = GrayImage::new(vec![1, 2, 3], 2, 2).unwrap_err();
    assert_eq!(err, TexSearchError::InvalidImage { width: 2, height: 2 });
}

#[test]
fn normalized_matrix_sums_to_one() {
    let mut rng = StdRng::seed_from_u64(11);
    for levels in [2usize, 8, 256] {
        for _ in 0..10 {
            let width = rng.random_range(2..24);
            let height = rng.random_range(1..24);
            let img = random_image(&mut rng, width, height, levels);
            let m = CoOccurrenceMatrix::horizontal(&img).unwrap();
            assert_eq!(m.levels(), levels);
            assert!((m.sum() - 1.0).abs() < 1e-9, "sum = {}", m.sum());
            assert!(m.as_slice().iter().all(|&p| p >= 0.0));
        }
    }
}

#[test]
fn symmetric_matrix_equals_transpose() {
    let mut rng = StdRng::seed_from_u64(5);
    for angle in [0.0, 45.0, 90.0, 135.0] {
        let img = random_image(&mut rng, 16, 12, 16);
        let cfg = GlcmConfig {
            offset: Offset::from_degrees(1, angle),
            ..GlcmConfig::default()
        };
        let m = CoOccurrenceMatrix::build(&img, cfg).unwrap();
        assert!(m.is_symmetric(1e-15), "angle {angle}");
    }
}

#[test]
fn unnormalized_counts_every_horizontal_pair_twice() {
    let img = GrayImage::filled(3, 5, 4).unwrap();
    let cfg = GlcmConfig {
        normalized: false,
        ..GlcmConfig::default()
    };
    let m = CoOccurrenceMatrix::build(&img, cfg).unwrap();
    // 4 pairs per row, 4 rows, both directions.
    assert_eq!(m.pairs(), 32);
    assert_eq!(m.get(3, 3), Some(32.0));
}

#[test]
fn constant_image_statistics() {
    let img = GrayImage::filled(5, 4, 4).unwrap();
    let m = CoOccurrenceMatrix::horizontal(&img).unwrap();
    assert_eq!(m.get(5, 5), Some(1.0));
    assert_eq!(m.nonzero().count(), 1);

    let sig = TextureSignature::extract(&m);
    assert_eq!(sig.dissimilarity, 0.0);
    assert_eq!(sig.contrast, 0.0);
    assert_eq!(sig.homogeneity, 1.0);
    assert_eq!(sig.correlation, 1.0);
    assert_eq!(sig.energy, 1.0);
    assert_eq!(sig.asm, 1.0);
}

#[test]
fn vertical_stripes_have_unit_contrast() {
    // Columns alternate 0/1, so every horizontal pair differs by one.
    let data: Vec<u8> = (0..16).map(|i| (i % 2) as u8).collect();
    let img = GrayImage::new(data, 4, 4).unwrap();
    let sig = glcm_signature(&img, GlcmConfig::default()).unwrap();
    assert!((sig.dissimilarity - 1.0).abs() < 1e-12);
    assert!((sig.contrast - 1.0).abs() < 1e-12);
    assert!((sig.homogeneity - 0.5).abs() < 1e-12);
    assert!((sig.correlation + 1.0).abs() < 1e-12);
}

#[test]
fn signature_order_is_positional() {
    let data: Vec<u8> = (0u8..64).map(|v| v.wrapping_mul(29)).collect();
    let img = GrayImage::new(data, 8, 8).unwrap();
    let stats = glcm_signature(&img, GlcmConfig::default()).unwrap();
    let sig = DescriptorKind::Glcm.extract(&img).unwrap();
    assert_eq!(sig.as_slice(), &stats.to_array());
    assert!((stats.energy * stats.energy - stats.asm).abs() < 1e-12);
}
