#![allow(missing_docs)]

use criterion::{BatchSize, Criterion, criterion_main};

use textured_mesh::testing::{TestMt as Mt, grid, rgba_image};
use textured_mesh::texture::TestAllocator;
use textured_mesh::{ColorMap, MeshState, MeshUuid, TextureUpdate, VertexCostUpdate};

criterion_main!(benches);
fn benches() {
    let mut c = Criterion::default().configure_from_args();
    state_benches(&mut c);
}

fn state_benches(c: &mut Criterion) {
    let mut g = c.benchmark_group("state");

    for n in [16, 128] {
        let (geometry, materials) = grid("bench", n);
        let costs = VertexCostUpdate {
            uuid: MeshUuid::from("bench"),
            costs: (0..geometry.vertices.len()).map(|i| i as f32).collect(),
            colormap: ColorMap::Rainbow,
            min_cost: None,
            max_cost: None,
        };

        g.bench_function(format!("geometry-{n}"), |b| {
            b.iter_batched(
                || (MeshState::<Mt>::new(TestAllocator::new()), geometry.clone()),
                |(mut state, geometry)| {
                    state.set_geometry(geometry).unwrap();
                    state
                },
                BatchSize::SmallInput,
            );
        });

        g.bench_function(format!("costs-{n}"), |b| {
            let mut state = MeshState::<Mt>::new(TestAllocator::new());
            state.set_geometry(geometry.clone()).unwrap();
            b.iter_batched(
                || costs.clone(),
                |costs| state.set_vertex_costs(costs).unwrap(),
                BatchSize::SmallInput,
            );
        });

        g.bench_function(format!("materials-textured-{n}"), |b| {
            b.iter_batched(
                || {
                    let mut state = MeshState::<Mt>::new(TestAllocator::new());
                    state.set_geometry(geometry.clone()).unwrap();
                    let _ = state
                        .add_texture(TextureUpdate {
                            uuid: MeshUuid::from("bench"),
                            materials_uuid: MeshUuid::from("bench"),
                            slot: 0,
                            image: rgba_image(64),
                        })
                        .unwrap();
                    (state, materials.clone())
                },
                |(mut state, materials)| {
                    state.set_materials(materials).unwrap();
                    state
                },
                BatchSize::SmallInput,
            );
        });
    }

    g.finish();
}
