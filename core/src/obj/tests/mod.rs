use crate::obj::ObjMesh;


/// Route loader diagnostics to the test output.
fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Position indices of every triangle, one triple per triangle.
fn position_triples(mesh: &ObjMesh) -> Vec<[u32; 3]> {
    mesh.iter_triangles()
        .map(|[a, b, c]| [a.position, b.position, c.position])
        .collect()
}
