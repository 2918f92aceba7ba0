//! Tick timing: serial vs rayon-parallel successor computation

use std::time::Instant;

use rand::{SeedableRng, rngs::StdRng};
use toroidal_life::{GridState, random_fill};

fn random_grid(size: u32) -> GridState {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let cells = random_fill(size, size, 0.3, &mut rng).expect("valid probability");
    GridState::create(size, size, cells).expect("valid dimensions")
}

fn benchmark_serial(size: u32, iterations: u32) -> f64 {
    let mut grid = random_grid(size).with_parallel_threshold(usize::MAX);

    let start = Instant::now();
    for _ in 0..iterations {
        grid.tick();
    }
    start.elapsed().as_secs_f64() * 1000.0 / iterations as f64
}

fn benchmark_parallel(size: u32, iterations: u32) -> f64 {
    let mut grid = random_grid(size).with_parallel_threshold(0);

    let start = Instant::now();
    for _ in 0..iterations {
        grid.tick();
    }
    start.elapsed().as_secs_f64() * 1000.0 / iterations as f64
}

fn main() {
    println!("Toroidal Life tick benchmark");
    println!("============================");
    println!();

    let sizes = [(50, 200), (100, 100), (250, 40), (500, 10), (1000, 4)];

    println!("{:>10} | {:>12} | {:>12} | {:>8}", "Grid", "Serial (ms)", "Parallel (ms)", "Speedup");
    println!("{}", "-".repeat(52));

    for (size, iterations) in sizes {
        let serial = benchmark_serial(size, iterations);
        let parallel = benchmark_parallel(size, iterations);
        println!(
            "{:>10} | {:>12.3} | {:>12.3} | {:>7.2}x",
            format!("{size}x{size}"),
            serial,
            parallel,
            serial / parallel
        );
    }
}
