use super::{BoundaryFace, H1Space};
use crate::StrError;
use gemlab::mesh::{Cell, Mesh, Point};
use gemlab::shapes::GeoKind;

/// Generates structured meshes of rectangles and boxes with marked boundaries
pub struct SampleMeshes {}

impl SampleMeshes {
    /// Generates a rectangle [0,lx]×[0,ly] with nx×ny Qua4 cells
    ///
    /// ```text
    ///         marker 3
    ///      +-----------+
    ///      |           |
    ///    4 |           | 2
    ///      |           |
    ///      +-----------+
    ///         marker 1
    /// ```
    ///
    /// Points are numbered along x first; the edges are ordered counterclockwise.
    pub fn block_qua4(nx: usize, ny: usize, lx: f64, ly: f64) -> Result<H1Space, StrError> {
        if nx < 1 || ny < 1 {
            return Err("the number of divisions must be ≥ 1");
        }
        if lx <= 0.0 || ly <= 0.0 {
            return Err("the lengths must be > 0.0");
        }
        let id = |i: usize, j: usize| i + (nx + 1) * j;
        let mut points = Vec::with_capacity((nx + 1) * (ny + 1));
        for j in 0..(ny + 1) {
            for i in 0..(nx + 1) {
                let x = lx * (i as f64) / (nx as f64);
                let y = ly * (j as f64) / (ny as f64);
                points.push(Point {
                    id: id(i, j),
                    marker: 0,
                    coords: vec![x, y],
                });
            }
        }
        let mut cells = Vec::with_capacity(nx * ny);
        let mut faces = Vec::new();
        for j in 0..ny {
            for i in 0..nx {
                let nodes = vec![id(i, j), id(i + 1, j), id(i + 1, j + 1), id(i, j + 1)];
                if j == 0 {
                    faces.push(edge(1, nodes[0], nodes[1]));
                }
                if i == nx - 1 {
                    faces.push(edge(2, nodes[1], nodes[2]));
                }
                if j == ny - 1 {
                    faces.push(edge(3, nodes[2], nodes[3]));
                }
                if i == 0 {
                    faces.push(edge(4, nodes[3], nodes[0]));
                }
                cells.push(Cell {
                    id: cells.len(),
                    marker: 1,
                    kind: GeoKind::Qua4,
                    points: nodes,
                });
            }
        }
        let mesh = Mesh {
            ndim: 2,
            points,
            cells,
            marked_edges: Vec::new(),
            marked_faces: Vec::new(),
        };
        H1Space::new(mesh, faces)
    }

    /// Generates a box [0,lx]×[0,ly]×[0,lz] with nx×ny×nz Hex8 cells
    ///
    /// The boundary markers are:
    ///
    /// ```text
    /// 1: z = 0    2: y = 0    3: x = lx
    /// 4: y = ly   5: x = 0    6: z = lz
    /// ```
    ///
    /// Points are numbered along x first, then y, then z; the faces are ordered such that
    /// their normals point outward.
    pub fn block_hex8(nx: usize, ny: usize, nz: usize, lx: f64, ly: f64, lz: f64) -> Result<H1Space, StrError> {
        if nx < 1 || ny < 1 || nz < 1 {
            return Err("the number of divisions must be ≥ 1");
        }
        if lx <= 0.0 || ly <= 0.0 || lz <= 0.0 {
            return Err("the lengths must be > 0.0");
        }
        let id = |i: usize, j: usize, k: usize| i + (nx + 1) * (j + (ny + 1) * k);
        let mut points = Vec::with_capacity((nx + 1) * (ny + 1) * (nz + 1));
        for k in 0..(nz + 1) {
            for j in 0..(ny + 1) {
                for i in 0..(nx + 1) {
                    let x = lx * (i as f64) / (nx as f64);
                    let y = ly * (j as f64) / (ny as f64);
                    let z = lz * (k as f64) / (nz as f64);
                    points.push(Point {
                        id: id(i, j, k),
                        marker: 0,
                        coords: vec![x, y, z],
                    });
                }
            }
        }
        let mut cells = Vec::with_capacity(nx * ny * nz);
        let mut faces = Vec::new();
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    let n = vec![
                        id(i, j, k),
                        id(i + 1, j, k),
                        id(i + 1, j + 1, k),
                        id(i, j + 1, k),
                        id(i, j, k + 1),
                        id(i + 1, j, k + 1),
                        id(i + 1, j + 1, k + 1),
                        id(i, j + 1, k + 1),
                    ];
                    if k == 0 {
                        faces.push(quad(1, [n[0], n[3], n[2], n[1]]));
                    }
                    if j == 0 {
                        faces.push(quad(2, [n[0], n[1], n[5], n[4]]));
                    }
                    if i == nx - 1 {
                        faces.push(quad(3, [n[1], n[2], n[6], n[5]]));
                    }
                    if j == ny - 1 {
                        faces.push(quad(4, [n[3], n[7], n[6], n[2]]));
                    }
                    if i == 0 {
                        faces.push(quad(5, [n[0], n[4], n[7], n[3]]));
                    }
                    if k == nz - 1 {
                        faces.push(quad(6, [n[4], n[5], n[6], n[7]]));
                    }
                    cells.push(Cell {
                        id: cells.len(),
                        marker: 1,
                        kind: GeoKind::Hex8,
                        points: n,
                    });
                }
            }
        }
        let mesh = Mesh {
            ndim: 3,
            points,
            cells,
            marked_edges: Vec::new(),
            marked_faces: Vec::new(),
        };
        H1Space::new(mesh, faces)
    }
}

fn edge(marker: i32, a: usize, b: usize) -> BoundaryFace {
    BoundaryFace {
        marker,
        kind: GeoKind::Lin2,
        points: vec![a, b],
    }
}

fn quad(marker: i32, nodes: [usize; 4]) -> BoundaryFace {
    BoundaryFace {
        marker,
        kind: GeoKind::Qua4,
        points: nodes.to_vec(),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
