use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use flame_grid::diffusion::{BandedMatrix, DiffusionSystem};
use flame_grid::grid::{BoundaryCondition, GridOptions, Mesh};

fn front_options() -> GridOptions {
    GridOptions {
        grid_max: 1.0,
        right_bc: BoundaryCondition::ZeroGradient,
        ..GridOptions::default()
    }
}

fn front_profile(x: &[f64], width: f64) -> Vec<Vec<f64>> {
    let temperature = x.iter().map(|x| ((x - 0.5) / width).tanh()).collect();
    let species = x
        .iter()
        .map(|x| 0.5 * (1.0 - ((x - 0.45) / width).tanh()))
        .collect();
    vec![temperature, species]
}

fn bench_adapt(c: &mut Criterion) {
    let mut group = c.benchmark_group("adapt");

    for &n_points in &[50usize, 200usize] {
        group.bench_with_input(
            BenchmarkId::new("tanh_front", n_points),
            &n_points,
            |b, &n_points| {
                b.iter(|| {
                    let mut mesh = Mesh::uniform(n_points, 0.0, 1.0, front_options())
                        .expect("valid grid");
                    let mut y = front_profile(mesh.x(), 0.02);
                    let changed = mesh.adapt(&mut y).expect("adapt");
                    black_box((changed, mesh.n_points()));
                });
            },
        );
    }

    group.finish();
}

fn bench_get_a(c: &mut Criterion) {
    let mut group = c.benchmark_group("diffusion_get_a");

    for &n_points in &[100usize, 1000usize] {
        let mesh = Mesh::uniform(n_points, 0.0, 1.0, front_options()).expect("valid grid");
        let mut system = DiffusionSystem::new();
        system
            .set_segment(0, mesh.jj())
            .expect("segment inside grid");
        system.b.fill(1.0);
        system.d.fill(1e-5);
        let mut a = BandedMatrix::tridiagonal(n_points);

        group.bench_with_input(BenchmarkId::new("planar", n_points), &n_points, |b, _| {
            b.iter(|| {
                system
                    .get_a(mesh.geometry(), &mut a)
                    .expect("assembly");
                black_box(&a);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_adapt, bench_get_a);
criterion_main!(benches);
