use super::study::{diffusion_sweep, energy_by_temperature, msd_sweep, noise_check};
use super::theory::*;
use super::*;
use crate::error::SimulationError;
use crate::langevin::{integrate, NoiseKind, Sample, Trajectory};
use crate::params::SimulationParameters;
use approx::*;

fn small_params() -> SimulationParameters {
    SimulationParameters::new(1.0, 1.0, 1.0, 0.01, 200).with_seed(5)
}

fn unit_grid(n: usize) -> Vec<f64> {
    (0..=n).map(|i| i as f64).collect()
}

// ===== TrajectoryEnsemble =====

#[test]
fn test_empty_ensemble_is_rejected() {
    assert!(matches!(
        TrajectoryEnsemble::new("empty", vec![]),
        Err(SimulationError::InconsistentGrid { .. })
    ));
}

#[test]
fn test_mismatched_members_are_rejected() {
    let a = integrate(&small_params()).unwrap();
    let mut shorter = small_params();
    shorter.n_steps = 150;
    let b = integrate(&shorter).unwrap();
    assert!(matches!(
        TrajectoryEnsemble::new("mixed", vec![a.clone(), b]),
        Err(SimulationError::InconsistentGrid { .. })
    ));

    let mut finer = small_params();
    finer.time_step = 0.005;
    let c = integrate(&finer).unwrap();
    assert!(matches!(
        TrajectoryEnsemble::new("mixed", vec![a, c]),
        Err(SimulationError::InconsistentGrid { .. })
    ));
}

#[test]
fn test_msd_matches_manual_average() {
    let params = small_params();
    let ensemble = TrajectoryEnsemble::generate("manual", &params, 4, NoiseKind::Gaussian).unwrap();
    let msd = ensemble.msd();

    assert_eq!(msd.len(), 201);
    assert_eq!(msd.values[0], 0.0);
    assert_eq!(msd.times, ensemble.times());

    let per_run = ensemble.per_trajectory_squared_displacement();
    assert_eq!(per_run.len(), 4);
    for i in [1, 50, 200] {
        let manual = per_run.iter().map(|r| r[i]).sum::<f64>() / 4.0;
        assert_relative_eq!(msd.values[i], manual, max_relative = 1e-14);
    }
}

#[test]
fn test_generated_members_use_consecutive_seeds() {
    let params = small_params();
    let ensemble = TrajectoryEnsemble::generate("seeds", &params, 3, NoiseKind::Gaussian).unwrap();
    for (run, traj) in ensemble.trajectories().iter().enumerate() {
        let solo = integrate(&params.with_seed(5 + run as u64)).unwrap();
        assert_eq!(traj, &solo);
    }

    let again = TrajectoryEnsemble::generate("seeds", &params, 3, NoiseKind::Gaussian).unwrap();
    assert_eq!(ensemble.msd(), again.msd());
}

#[test]
fn test_generate_rejects_bad_input() {
    assert!(matches!(
        TrajectoryEnsemble::generate("none", &small_params(), 0, NoiseKind::Gaussian),
        Err(SimulationError::InvalidParameter { name: "n_runs", .. })
    ));
    let mut params = small_params();
    params.friction = -1.0;
    assert!(matches!(
        TrajectoryEnsemble::generate("bad", &params, 2, NoiseKind::Gaussian),
        Err(SimulationError::InvalidParameter { name: "friction", .. })
    ));
}

#[test]
fn test_external_trajectories_join_an_ensemble() {
    let samples: Vec<Sample> = (0..=3)
        .map(|i| Sample {
            t: i as f64 * 0.5,
            x: i as f64,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
        })
        .collect();
    let traj = Trajectory::from_samples(0.5, samples).unwrap();
    let ensemble = TrajectoryEnsemble::new("external", vec![traj.clone(), traj]).unwrap();
    assert_eq!(ensemble.msd().values, vec![0.0, 1.0, 4.0, 9.0]);
}

// ===== DiffusionEstimator =====

#[test]
fn test_ratio_mean_recovers_exact_line() {
    let times = unit_grid(10);
    let msd: Vec<f64> = times.iter().map(|t| 4.0 * 0.75 * t).collect();
    let fit = DiffusionEstimator::new(FitMethod::RatioMean)
        .fit(&msd, &times, FitWindow::default())
        .unwrap();
    assert_relative_eq!(fit.d_estimate, 0.75, max_relative = 1e-12);
    assert_eq!(fit.window_start, 5.0);
    assert_eq!(fit.window_end, 10.0);
    assert_eq!(fit.n_points, 6);
    assert_eq!(fit.intercept, None);
}

#[test]
fn test_regression_has_free_intercept() {
    let times = unit_grid(20);
    let msd: Vec<f64> = times.iter().map(|t| 4.0 * 2.0 * t - 3.0).collect();
    let fit = DiffusionEstimator::new(FitMethod::LinearRegression)
        .fit(&msd, &times, FitWindow::default())
        .unwrap();
    assert_relative_eq!(fit.d_estimate, 2.0, max_relative = 1e-12);
    assert_relative_eq!(fit.intercept.unwrap(), -3.0, epsilon = 1e-10);
    assert_relative_eq!(fit.relative_error(2.0), 0.0, epsilon = 1e-12);
}

#[test]
fn test_empty_window_is_insufficient() {
    let times = unit_grid(10);
    let msd: Vec<f64> = times.iter().map(|t| 4.0 * t).collect();
    for method in [FitMethod::RatioMean, FitMethod::LinearRegression] {
        let estimator = DiffusionEstimator::new(method);
        assert!(matches!(
            estimator.fit(&msd, &times, FitWindow::new(0.0, 0.0)),
            Err(SimulationError::InsufficientSamples { .. })
        ));
        assert!(matches!(
            estimator.fit(&msd, &times, FitWindow::new(8.0, 2.0)),
            Err(SimulationError::InsufficientSamples { .. })
        ));
    }
}

#[test]
fn test_ratio_mean_refuses_t_zero() {
    let times = unit_grid(10);
    let msd: Vec<f64> = times.iter().map(|t| 4.0 * t).collect();
    let window = FitWindow::new(0.0, 5.0);
    assert!(matches!(
        DiffusionEstimator::new(FitMethod::RatioMean).fit(&msd, &times, window),
        Err(SimulationError::DivisionByZero { index: 0 })
    ));
    let fit = DiffusionEstimator::new(FitMethod::LinearRegression)
        .fit(&msd, &times, window)
        .unwrap();
    assert_relative_eq!(fit.d_estimate, 1.0, max_relative = 1e-12);
}

#[test]
fn test_regression_needs_two_points() {
    let times = unit_grid(10);
    let msd: Vec<f64> = times.iter().map(|t| 4.0 * t).collect();
    assert!(matches!(
        DiffusionEstimator::new(FitMethod::LinearRegression).fit(
            &msd,
            &times,
            FitWindow::new(3.0, 3.0),
        ),
        Err(SimulationError::InsufficientSamples { needed: 2, found: 1 })
    ));
    let fit = DiffusionEstimator::new(FitMethod::RatioMean)
        .fit(&msd, &times, FitWindow::new(3.0, 3.0))
        .unwrap();
    assert_eq!(fit.n_points, 1);
}

#[test]
fn test_fit_rejects_mismatched_arrays() {
    assert!(matches!(
        DiffusionEstimator::default().fit(&[0.0, 1.0], &[0.0, 1.0, 2.0], FitWindow::default()),
        Err(SimulationError::InconsistentGrid { .. })
    ));
    assert!(matches!(
        DiffusionEstimator::default().fit(
            &[0.0, 1.0],
            &[0.0, 1.0],
            FitWindow::from_start(f64::NAN),
        ),
        Err(SimulationError::InvalidParameter { .. })
    ));
}

#[test]
fn test_fit_method_parsing() {
    assert_eq!("ratio".parse::<FitMethod>().unwrap(), FitMethod::RatioMean);
    assert_eq!("lstsq".parse::<FitMethod>().unwrap(), FitMethod::LinearRegression);
    assert!("spline".parse::<FitMethod>().is_err());
}

// ===== Theory =====

#[test]
fn test_theoretical_msd_limits() {
    let (temp, mass, gamma, k_b) = (1.5, 2.0, 0.5, 1.0);
    let tau = relaxation_time(mass, gamma);
    let d = diffusion_coefficient(temp, k_b, gamma);

    assert_eq!(theoretical_msd(0.0, temp, mass, gamma, k_b), 0.0);

    // diffusive: relative gap to 4Dt is tau/t
    for factor in [1e2, 1e3, 1e4] {
        let t = factor * tau;
        let gap = (theoretical_msd(t, temp, mass, gamma, k_b) - diffusive_msd(t, d)).abs()
            / diffusive_msd(t, d);
        assert_relative_eq!(gap, 1.0 / factor, max_relative = 1e-6);
    }

    // ballistic: 2 k_B T t^2 / m
    let t = 1e-4 * tau;
    let ballistic = 2.0 * k_b * temp * t * t / mass;
    assert_relative_eq!(theoretical_msd(t, temp, mass, gamma, k_b), ballistic, max_relative = 1e-3);
}

#[test]
fn test_einstein_relation_is_mass_independent() {
    assert_relative_eq!(diffusion_coefficient(2.0, 1.0, 0.5), 4.0);
    let curve_light = theoretical_msd_curve(&[1000.0], 1.0, 0.5, 1.0, 1.0);
    let curve_heavy = theoretical_msd_curve(&[1000.0], 1.0, 2.0, 1.0, 1.0);
    assert_relative_eq!(curve_light[0], curve_heavy[0], max_relative = 2e-3);
}

#[test]
fn test_boltzmann_density_normalisation() {
    for (temp, k_b) in [(0.5, 1.0), (1.0, 1.0), (2.0, 1.0), (300.0, 0.0083)] {
        let kt: f64 = temp * k_b;
        let upper = 60.0 * kt;
        let n = 60_000;
        let h = upper / n as f64;
        let ends =
            boltzmann_energy_density(0.0, temp, k_b) + boltzmann_energy_density(upper, temp, k_b);
        let mut integral = 0.5 * ends;
        for i in 1..n {
            integral += boltzmann_energy_density(i as f64 * h, temp, k_b);
        }
        integral *= h;
        assert_relative_eq!(integral, 1.0, epsilon = 1e-6);
    }
    assert_eq!(boltzmann_energy_density(-1.0, 1.0, 1.0), 0.0);
    assert_relative_eq!(mean_kinetic_energy(2.0, 1.0), 2.0);
}

#[test]
fn test_standard_normal_density_peak() {
    assert_relative_eq!(standard_normal_density(0.0), 0.398_942_280_401_432_7, epsilon = 1e-15);
    assert_relative_eq!(standard_normal_density(1.0), standard_normal_density(-1.0));
}

// ===== Histogram / energy =====

#[test]
fn test_histogram_density_integrates_to_one() {
    let values: Vec<f64> = (0..1000).map(|i| (i as f64 * 0.37).sin()).collect();
    let hist = Histogram::new(&values, 20).unwrap();
    assert_eq!(hist.bins(), 20);
    assert_eq!(hist.counts.iter().sum::<usize>(), 1000);
    let area: f64 = hist.density.iter().map(|d| d * hist.bin_width()).sum();
    assert_relative_eq!(area, 1.0, epsilon = 1e-12);
    assert_eq!(hist.centers().len(), 20);
}

#[test]
fn test_histogram_edge_cases() {
    let hist = Histogram::new(&[0.0, 1.0], 4).unwrap();
    assert_eq!(hist.counts, vec![1, 0, 0, 1]);

    let flat = Histogram::new(&[2.0, 2.0, 2.0], 3).unwrap();
    assert_eq!(flat.edges[0], 1.5);
    assert_eq!(flat.edges[3], 2.5);
    assert_eq!(flat.counts, vec![0, 3, 0]);

    assert!(Histogram::new(&[1.0], 0).is_err());
    assert!(Histogram::new(&[], 5).is_err());
    assert!(Histogram::new(&[1.0, f64::NAN], 5).is_err());
}

#[test]
fn test_energy_pooling() {
    let params = small_params();
    let ensemble = TrajectoryEnsemble::generate("energy", &params, 3, NoiseKind::Gaussian).unwrap();

    let all = EnergyAnalyzer::energies(&ensemble, params.mass, 0).unwrap();
    assert_eq!(all.len(), 3 * 201);
    assert_eq!(all[0], 0.0);
    assert!(all.iter().all(|&e| e >= 0.0));

    let tail = EnergyAnalyzer::energies(&ensemble, params.mass, 150).unwrap();
    assert_eq!(tail.len(), 3 * 51);
    let last = ensemble.trajectories()[0].last().kinetic_energy(params.mass);
    assert_eq!(tail[50], last);

    assert!(matches!(
        EnergyAnalyzer::energies(&ensemble, params.mass, 201),
        Err(SimulationError::InsufficientSamples { .. })
    ));
    assert!(EnergyAnalyzer::energies(&ensemble, 0.0, 0).is_err());
}

#[test]
fn test_energy_summary_and_comparison() {
    let samples = [0.5, 1.0, 1.5, 2.0];
    let summary = EnergyAnalyzer::summary(&samples, 3).unwrap();
    assert_relative_eq!(summary.mean, 1.25);
    assert_relative_eq!(summary.variance, 0.3125);
    assert_eq!(summary.n_samples, 4);

    let comparison = summary.compare_boltzmann(1.0, 1.0);
    assert_eq!(comparison.len(), 3);
    for point in comparison {
        assert_relative_eq!(point.theory, (-point.center).exp(), max_relative = 1e-12);
    }

    assert!(matches!(
        EnergyAnalyzer::summary(&[], 10),
        Err(SimulationError::InsufficientSamples { .. })
    ));
}

// ===== Studies =====

#[test]
fn test_swept_parameter_apply() {
    let base = small_params();
    assert_eq!(SweptParameter::Mass.apply(&base, 3.0).mass, 3.0);
    assert_eq!(SweptParameter::Friction.apply(&base, 0.5).friction, 0.5);
    let hot = SweptParameter::Temperature.apply(&base, 5.0);
    assert_eq!(hot.temperature, 5.0);
    assert_eq!(hot.mass, base.mass);
    assert_eq!("gamma".parse::<SweptParameter>().unwrap(), SweptParameter::Friction);
}

#[test]
fn test_diffusion_sweep_reports_einstein_values() {
    let sweep = ParameterSweep::new(SweptParameter::Temperature, vec![0.5, 1.0, 2.0]);
    let points = diffusion_sweep(
        &small_params(),
        &sweep,
        3,
        NoiseKind::Gaussian,
        DiffusionEstimator::default(),
        FitWindow::default(),
    )
    .unwrap();
    assert_eq!(points.len(), 3);
    for (point, temp) in points.iter().zip([0.5, 1.0, 2.0]) {
        assert_eq!(point.value, temp);
        assert_relative_eq!(point.d_theory, temp);
        assert!(point.d_fit.is_finite() && point.d_fit > 0.0);
    }

    let empty = ParameterSweep::new(SweptParameter::Mass, vec![]);
    assert!(diffusion_sweep(
        &small_params(),
        &empty,
        3,
        NoiseKind::Gaussian,
        DiffusionEstimator::default(),
        FitWindow::default()
    )
    .is_err());
}

#[test]
fn test_msd_sweep_curves_share_grid() {
    let sweep = ParameterSweep::new(SweptParameter::Mass, vec![0.5, 2.0]);
    let points = msd_sweep(&small_params(), &sweep, 2, NoiseKind::BoxMuller).unwrap();
    for point in &points {
        assert_eq!(point.msd.len(), 201);
        assert_eq!(point.theory.len(), 201);
        assert_eq!(point.diffusive.len(), 201);
        assert_eq!(point.per_trajectory.len(), 2);
        assert_eq!(point.theory[0], 0.0);
    }
}

#[test]
fn test_energy_by_temperature_and_noise_check() {
    let points =
        energy_by_temperature(&small_params(), &[0.5, 2.0], 2, NoiseKind::Gaussian, 10, 15)
            .unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].summary.n_samples, 2 * 191);
    assert_eq!(points[1].comparison.len(), 15);

    let checks = noise_check(NoiseKind::BoxMuller, Some(1), &[50, 100, 1000], 20).unwrap();
    assert_eq!(checks.len(), 3);
    for (check, n) in checks.iter().zip([50, 100, 1000]) {
        assert_eq!(check.n_samples, n);
        assert_eq!(check.histogram.counts.iter().sum::<usize>(), n);
    }
}

#[test]
fn test_boltzmann_constant_scales_noise_diffusion_and_energy() {
    let unit = small_params();
    let doubled = small_params().with_k_boltzmann(2.0);
    assert_relative_eq!(unit.noise_amplitude(), 2.0_f64.sqrt(), max_relative = 1e-15);
    assert_relative_eq!(doubled.noise_amplitude(), 2.0, max_relative = 1e-15);
    assert_relative_eq!(doubled.duration(), 2.0, max_relative = 1e-15);

    // same noise, so velocities and positions grow by sqrt(k_B)
    let a = TrajectoryEnsemble::generate("kB=1", &unit, 4, NoiseKind::Gaussian).unwrap();
    let b = TrajectoryEnsemble::generate("kB=2", &doubled, 4, NoiseKind::Gaussian).unwrap();
    let (msd_a, msd_b) = (a.msd(), b.msd());
    for i in [1, 100, 200] {
        assert_relative_eq!(msd_b.values[i], 2.0 * msd_a.values[i], max_relative = 1e-9);
    }

    let estimator = DiffusionEstimator::default();
    let d_a = estimator.fit_curve(&msd_a, FitWindow::default()).unwrap();
    let d_b = estimator.fit_curve(&msd_b, FitWindow::default()).unwrap();
    assert_relative_eq!(d_b.d_estimate, 2.0 * d_a.d_estimate, max_relative = 1e-9);
    assert_relative_eq!(diffusion_coefficient(1.0, 2.0, 1.0), 2.0);

    let e_a = EnergyAnalyzer::energies(&a, unit.mass, 50).unwrap();
    let e_b = EnergyAnalyzer::energies(&b, doubled.mass, 50).unwrap();
    let mean_a = EnergyAnalyzer::summary(&e_a, 10).unwrap().mean;
    let summary_b = EnergyAnalyzer::summary(&e_b, 10).unwrap();
    assert_relative_eq!(summary_b.mean, 2.0 * mean_a, max_relative = 1e-9);
    assert_relative_eq!(mean_kinetic_energy(1.0, 2.0), 2.0);

    let comparison = summary_b.compare_boltzmann(1.0, 2.0);
    for point in comparison {
        assert_relative_eq!(point.theory, 0.5 * (-point.center / 2.0).exp(), max_relative = 1e-12);
    }
}
