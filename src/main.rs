use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use qmc_sampling::{
    read_run_config, sample_start, samples_from, HamiltonianSampler, HmcParams, Hydrogenic,
    LangevinParams, LangevinSampler, MetropolisSampler, SamplerKind, SamplingError,
    Trajectory,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.yml")]
    config: String,
    /// Seed for the random stream; entropy-seeded when omitted
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() {
    let args = Args::parse();
    let cfg = read_run_config(&args.config);

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let wf = Hydrogenic::from_geometry(&cfg.geometry);
    let n_electrons = cfg.geometry.n_electrons();
    let rs = sample_start(&cfg.geometry, cfg.n_walker, n_electrons, cfg.init_var, &mut rng);

    let result: Result<Trajectory, SamplingError> = match cfg.sampler {
        SamplerKind::Metropolis => {
            let mut sampler = MetropolisSampler::new(wf, rs, cfg.stepsize, rng);
            samples_from(&mut sampler, 0..cfg.n_steps, cfg.n_discard, cfg.n_decorrelate)
        }
        SamplerKind::Langevin => {
            let params = LangevinParams::new(cfg.tau).with_cutoff(cfg.cutoff);
            match LangevinSampler::new(wf, rs, params, rng) {
                Ok(mut sampler) => samples_from(
                    &mut sampler,
                    0..cfg.n_steps,
                    cfg.n_discard,
                    cfg.n_decorrelate,
                ),
                Err(e) => Err(e),
            }
        }
        SamplerKind::Hmc => {
            let params = HmcParams::new(cfg.stepsize, cfg.tau, cfg.dysteps).with_cutoff(cfg.cutoff);
            let mut sampler = HamiltonianSampler::new(wf, rs, params, rng);
            samples_from(&mut sampler, 0..cfg.n_steps, cfg.n_discard, cfg.n_decorrelate)
        }
    };

    let trajectory = match result {
        Ok(trajectory) => trajectory,
        Err(e) => {
            eprintln!("sampling failed: {e}");
            std::process::exit(1);
        }
    };

    println!("QMC sampling run");
    println!("----------------------------------------");
    println!("Sampler: {:?}", cfg.sampler);
    println!("Walkers: {}", cfg.n_walker);
    println!("Electrons per walker: {}", n_electrons);
    println!(
        "Steps pulled: {} (discarded first {}, thinning stride {})",
        cfg.n_steps,
        cfg.n_discard,
        cfg.n_decorrelate + 1
    );
    println!("Retained samples: {}", trajectory.n_retained());
    println!("Mean acceptance: {:.4}", trajectory.mean_acceptance());

    if let Some(lifetime) = trajectory
        .infos
        .last()
        .and_then(|info| info.lifetime.as_ref())
    {
        let mean_lifetime: f64 =
            lifetime.iter().map(|&l| l as f64).sum::<f64>() / lifetime.len() as f64;
        println!("Mean walker lifetime at final step: {:.2}", mean_lifetime);
    }

    if let (Some(first), Some(last)) = (trajectory.psis.first(), trajectory.psis.last()) {
        let mean_abs = |psis: &Vec<f64>| {
            psis.iter().map(|p| p.abs()).sum::<f64>() / psis.len() as f64
        };
        println!(
            "Mean |psi|: {:.6e} (first retained) -> {:.6e} (last retained)",
            mean_abs(first),
            mean_abs(last)
        );
    }
}
