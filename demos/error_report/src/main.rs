use std::str::FromStr;

use argh::FromArgs;

use qvv_bound::sampling::{evaluate_sample_set, fibonacci_circle, fibonacci_sphere, ErrorSummary};
use qvv_bound::{estimate_error, point_error, Domain, Transform};

/// Three comma separated numbers, e.g. `1,0.5,-2`.
#[derive(Debug, Clone, Copy)]
struct Triple([f64; 3]);

impl FromStr for Triple {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|v| v.trim().parse::<f64>().map_err(|e| format!("{v}: {e}")))
            .collect::<Result<Vec<_>, _>>()?;
        match values.as_slice() {
            [x, y, z] => Ok(Self([*x, *y, *z])),
            _ => Err(format!("expected three comma separated values, got {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct DomainArg(Domain);

impl FromStr for DomainArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sphere" => Ok(Self(Domain::Sphere)),
            "circle" => Ok(Self(Domain::Circle)),
            _ => Err(format!("unknown domain {s}, expected sphere or circle")),
        }
    }
}

#[derive(FromArgs)]
/// Compare the analytic error bound of a raw/lossy transform pair with a sampled one
struct Args {
    /// domain to evaluate on: sphere or circle
    #[argh(option, default = "DomainArg(Domain::Sphere)")]
    domain: DomainArg,

    /// yaw of the raw rotation axis, in degrees
    #[argh(option, default = "0.0")]
    raw_axis_yaw: f64,

    /// pitch of the raw rotation axis, in degrees
    #[argh(option, default = "0.0")]
    raw_axis_pitch: f64,

    /// raw rotation angle, in degrees
    #[argh(option, default = "20.0")]
    raw_angle: f64,

    /// raw translation
    #[argh(option, default = "Triple([0.0; 3])")]
    raw_translation: Triple,

    /// raw scale
    #[argh(option, default = "Triple([1.0; 3])")]
    raw_scale: Triple,

    /// yaw of the lossy rotation axis, in degrees
    #[argh(option, default = "61.4")]
    lossy_axis_yaw: f64,

    /// pitch of the lossy rotation axis, in degrees
    #[argh(option, default = "0.0")]
    lossy_axis_pitch: f64,

    /// lossy rotation angle, in degrees
    #[argh(option, default = "128.6")]
    lossy_angle: f64,

    /// lossy translation
    #[argh(option, default = "Triple([2.0, 5.0, 0.0])")]
    lossy_translation: Triple,

    /// lossy scale
    #[argh(option, default = "Triple([1.0; 3])")]
    lossy_scale: Triple,

    /// number of lattice points used for the sampled error
    #[argh(option, default = "100_000")]
    num_samples: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();
    let domain = args.domain.0;

    let raw = Transform::from_axis_angle_deg(
        args.raw_axis_yaw,
        args.raw_axis_pitch,
        args.raw_angle,
        args.raw_translation.0,
        args.raw_scale.0,
    );
    let lossy = Transform::from_axis_angle_deg(
        args.lossy_axis_yaw,
        args.lossy_axis_pitch,
        args.lossy_angle,
        args.lossy_translation.0,
        args.lossy_scale.0,
    );
    log::debug!("raw: {raw:?}");
    log::debug!("lossy: {lossy:?}");

    let estimate = estimate_error(&raw, &lossy, domain)?;

    let points = match domain {
        Domain::Sphere => fibonacci_sphere(args.num_samples),
        Domain::Circle => fibonacci_circle(args.num_samples),
    };
    let errors = evaluate_sample_set(&points, &raw, &lossy);
    let summary = ErrorSummary::from_errors(&errors).ok_or("no samples to evaluate")?;

    println!("{domain:?} sampled max error: {}", summary.max);
    println!("{domain:?} sampled max error location: {:?}", points[summary.worst_index]);
    println!("{domain:?} computed max error: {} ({:?})", estimate.bound, estimate.kind);
    println!(
        "{domain:?} computed max error location: {:?} (error {})",
        estimate.point,
        point_error(estimate.point, &raw, &lossy)
    );

    if estimate.bound < summary.max {
        log::warn!(
            "computed bound is below the sampled max by {}",
            summary.max - estimate.bound
        );
    }

    Ok(())
}
