use listbench::stats::{RunStatistics, SampleSizeEstimator, Variance};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn population_and_sample_variance() {
    let samples = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];

    let population = RunStatistics::compute(&samples, Variance::Population);
    assert!(approx(population.mean, 5.0));
    assert!(approx(population.std_dev, 2.0));
    assert_eq!(population.samples, 8);

    let sample = RunStatistics::compute(&samples, Variance::Sample);
    assert!(approx(sample.mean, 5.0));
    assert!(approx(sample.std_dev, (32.0f64 / 7.0).sqrt()));
    assert_eq!(sample.samples, 8);
}

#[test]
fn degenerate_samples() {
    let empty = RunStatistics::compute(&[], Variance::Sample);
    assert_eq!(empty, RunStatistics::default());

    let single = RunStatistics::compute(&[42.0], Variance::Sample);
    assert!(approx(single.mean, 42.0));
    assert!(approx(single.std_dev, 0.0));

    let constant = RunStatistics::compute(&[3.0; 10], Variance::Population);
    assert!(approx(constant.std_dev, 0.0));
}

#[test]
fn zero_variance_needs_no_more_samples() {
    assert!(SampleSizeEstimator::serial().estimate(0.0, 100.0) <= 1);
}

#[test]
fn degenerate_mean_needs_no_more_samples() {
    let serial = SampleSizeEstimator::serial();
    assert_eq!(serial.estimate(10.0, 0.0), 0);
    assert_eq!(serial.estimate(10.0, -5.0), 0);
    assert_eq!(serial.estimate(std::f64::NAN, 100.0), 0);
}

// ceil((1.96 * 10 / 5)^2) = ceil(15.3664) = 16
#[test]
fn estimate_serial_and_concurrent() {
    assert_eq!(SampleSizeEstimator::serial().estimate(10.0, 100.0), 16);
    assert_eq!(SampleSizeEstimator::concurrent().estimate(10.0, 100.0), 30);
}

#[test]
fn concurrent_floor_applies_to_degenerate_input() {
    assert_eq!(SampleSizeEstimator::concurrent().estimate(0.0, 100.0), 30);
}

#[test]
fn estimate_grows_with_relative_spread() {
    let estimator = SampleSizeEstimator::serial();
    // (1.96 * 50 / 5)^2 = 384.16
    assert_eq!(estimator.estimate(50.0, 100.0), 385);
    assert_eq!(SampleSizeEstimator::concurrent().estimate(50.0, 100.0), 385);
    assert!(estimator.estimate(20.0, 100.0) > estimator.estimate(10.0, 100.0));
}
