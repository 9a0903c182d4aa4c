use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use texsearch::Metric;

fn random_vec(rng: &mut StdRng, len: usize) -> Vec<f64> {
    (0..len).map(|_| rng.random_range(-10.0..10.0)).collect()
}

#[test]
fn metrics_are_symmetric_and_zero_on_identity() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let a = random_vec(&mut rng, 6);
        let b = random_vec(&mut rng, 6);
        for metric in Metric::ALL {
            let ab = metric.distance(&a, &b).unwrap();
            let ba = metric.distance(&b, &a).unwrap();
            assert!((ab - ba).abs() < 1e-12, "{metric}");
            assert!(ab >= 0.0);
            assert_eq!(metric.distance(&a, &a).unwrap(), 0.0, "{metric}");
        }
    }
}

#[test]
fn triangle_inequality_holds_for_true_metrics() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let a = random_vec(&mut rng, 6);
        let b = random_vec(&mut rng, 6);
        let c = random_vec(&mut rng, 6);
        for metric in [Metric::Euclidean, Metric::Manhattan, Metric::Chebyshev] {
            let ac = metric.distance(&a, &c).unwrap();
            let ab = metric.distance(&a, &b).unwrap();
            let bc = metric.distance(&b, &c).unwrap();
            assert!(ac <= ab + bc + 1e-9, "{metric}: {ac} > {ab} + {bc}");
        }
    }
}

#[test]
fn canberra_zero_pairs_never_produce_nan() {
    let a = [0.0, 0.0, 1.0, 0.0];
    let b = [0.0, 2.0, 1.0, 0.0];
    let d = Metric::Canberra.distance(&a, &b).unwrap();
    assert!(d.is_finite());
    assert!((d - 1.0).abs() < 1e-12);
    assert_eq!(Metric::Canberra.distance(&[0.0; 6], &[0.0; 6]).unwrap(), 0.0);
}

#[test]
fn euclidean_of_unit_offset_in_six_dimensions() {
    let d = Metric::Euclidean.distance(&[0.0; 6], &[1.0; 6]).unwrap();
    assert!((d - 6f64.sqrt()).abs() < 1e-12);
}
