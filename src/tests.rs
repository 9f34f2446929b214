use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coupled_driving_feeds_the_trace_engine() {
        let t = TimeGrid::linspace(0.0, 1.0, 300).unwrap();
        let x0 = [-1.0, 0.0, 1.0];
        let mut rng = StdRng::seed_from_u64(2024);
        let u = multiple_driving_functions(&x0, &t, 2.618, &EulerMaruyama, &mut rng).unwrap();
        let z = multiple_slits(&t, &u).unwrap();

        assert_eq!(z.slits(), 3);
        assert_eq!(z.steps(), 300);
        for (slit, path) in u.iter().enumerate() {
            assert_eq!(z[(slit, 0)].re, path[0]);
        }
        assert!(z.is_well_formed());
    }

    #[test]
    fn seeded_pipeline_is_bit_identical() {
        let t = TimeGrid::linspace(0.0, 1.0, 100).unwrap();
        let run = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            let u = multiple_driving_functions(
                &[-0.5, 0.5],
                &t,
                1.0,
                &EulerMaruyama,
                &mut rng,
            )
            .unwrap();
            multiple_slits(&t, &u).unwrap()
        };
        assert_eq!(run(99), run(99));
        assert_ne!(run(99), run(100));
    }

    #[test]
    fn brownian_single_slit_stays_above_the_axis() {
        let mut rng = StdRng::seed_from_u64(17);
        let spec = DrivingSpec::brownian(0.0, 4.0);
        let u = driving_function(200, 0.005, &spec, &EulerMaruyama, &mut rng).unwrap();
        let t = TimeGrid::uniform(0.005, 200).unwrap();
        let z = single_slit(&t, &u).unwrap();
        assert_eq!(z.len(), 200);
        assert!(z.iter().all(|w| w.is_finite() && w.im >= 0.0));
    }

    #[test]
    fn unknown_method_never_yields_a_path() {
        let parsed = "XYZ".parse::<DrivingMethod>();
        assert!(matches!(parsed, Err(SleError::UnknownMethod(ref name)) if name == "XYZ"));
    }

    #[test]
    fn burgers_is_independent_of_the_trace_engine() {
        let t = TimeGrid::linspace(0.0, 1.0, 50).unwrap();
        let endpoints = burgers(&t, 12, &Scheme::default()).unwrap();
        assert_eq!(endpoints.len(), 12);
        assert!(endpoints.iter().all(|x| x.im > 0.0));
    }

    #[test]
    fn trace_points_agree_with_single_step_formula() {
        // on a two-point grid only the last point moves, once per pair
        let t = TimeGrid::new(vec![0.0, 0.3]).unwrap();
        let z = multiple_slits(&t, &[vec![0.0, 0.2]]).unwrap();
        let seed = num_complex::Complex64::new(0.2, SEED_OFFSET);
        assert_eq!(z[(0, 1)], vertical_slit_zip(seed, 0.3, 0.2));
    }
}
