use crate::base::{Coefficient, H1Space};
use crate::material::{pair, StateArena, StressStrain};
use crate::StrError;
use gemlab::integ::Gauss;
use gemlab::mesh::Cell;
use gemlab::shapes::Scratchpad;
use russell_lab::{Matrix, Vector};

/// Implements a total-Lagrangian solid element
///
/// All integration-point data is computed once on the reference configuration:
/// the gradients of the shape functions G = ∂N/∂X, the volume factors dV = det(J) w,
/// the element mass matrix, and the element viscous matrix.
pub struct ElementSolid {
    /// Index of the cell (also the index in the StateArena)
    pub index: usize,

    /// Space dimension
    ndim: usize,

    /// Number of nodes of the cell
    nnode: usize,

    /// Local-to-global mapping (true degrees of freedom)
    pub local_to_global: Vec<usize>,

    /// Shape function gradients at each integration point (nnode × ndim)
    gradients: Vec<Matrix>,

    /// Shape functions at each integration point (nnode)
    interp: Vec<Vector>,

    /// Real coordinates of each integration point
    ip_coords: Vec<Vec<f64>>,

    /// Volume factor of each integration point
    dvol: Vec<f64>,

    /// Element mass matrix (ρ ∫ Nᵃ Nᵇ dV δᵢⱼ)
    pub mass: Matrix,

    /// Element viscous matrix (∫ μ ∇Nᵃ · ∇Nᵇ dV δᵢⱼ)
    pub viscous: Matrix,
}

impl ElementSolid {
    /// Allocates a new instance
    ///
    /// The viscosity (scalar coefficient) is evaluated at t = 0 and must not depend on time.
    pub fn new(
        space: &H1Space,
        index: usize,
        cell: &Cell,
        ngauss: Option<usize>,
        density: f64,
        viscosity: Option<&Coefficient>,
    ) -> Result<Self, StrError> {
        // pad and integration points
        let ndim = space.mesh.ndim;
        let (kind, points) = (cell.kind, &cell.points);
        let mut pad = Scratchpad::new(ndim, kind)?;
        space.mesh.set_pad(&mut pad, points);
        let gauss = Gauss::new_or_sized(kind, ngauss)?;
        let nnode = kind.nnode();
        let ngp = gauss.npoint();

        // integration point data
        let mut gradients = Vec::with_capacity(ngp);
        let mut interp = Vec::with_capacity(ngp);
        let mut ip_coords = Vec::with_capacity(ngp);
        let mut dvol = Vec::with_capacity(ngp);
        for p in 0..ngp {
            let ksi = gauss.coords(p);
            let det_jac = pad.calc_gradient(ksi)?;
            if det_jac <= 0.0 {
                return Err("the Jacobian determinant of a cell must be positive");
            }
            (pad.fn_interp)(&mut pad.interp, ksi);
            let mut x = vec![0.0; ndim];
            for i in 0..ndim {
                for m in 0..nnode {
                    x[i] += pad.interp[m] * pad.xxt.get(i, m);
                }
            }
            gradients.push(pad.gradient.clone());
            interp.push(pad.interp.clone());
            ip_coords.push(x);
            dvol.push(det_jac * gauss.weight(p));
        }

        // mass and viscous matrices
        let neq = nnode * ndim;
        let mut mass = Matrix::new(neq, neq);
        let mut viscous = Matrix::new(neq, neq);
        for p in 0..ngp {
            let mu = match viscosity {
                Some(coef) => coef.eval_scalar(&ip_coords[p], 0.0)?,
                None => 0.0,
            };
            let (nn, gg, dv) = (&interp[p], &gradients[p], dvol[p]);
            for m in 0..nnode {
                for n in 0..nnode {
                    let mut gg_dot = 0.0;
                    for k in 0..ndim {
                        gg_dot += gg.get(m, k) * gg.get(n, k);
                    }
                    let m_mn = density * nn[m] * nn[n] * dv;
                    let s_mn = mu * gg_dot * dv;
                    for i in 0..ndim {
                        mass.add(m * ndim + i, n * ndim + i, m_mn);
                        viscous.add(m * ndim + i, n * ndim + i, s_mn);
                    }
                }
            }
        }

        Ok(ElementSolid {
            index,
            ndim,
            nnode,
            local_to_global: space.dofs_of_points(points),
            gradients,
            interp,
            ip_coords,
            dvol,
            mass,
            viscous,
        })
    }

    /// Returns the number of integration points
    pub fn n_integ_points(&self) -> usize {
        self.dvol.len()
    }

    /// Returns the volume of the element in the reference configuration
    pub fn volume(&self) -> f64 {
        self.dvol.iter().sum()
    }

    /// Computes the (3×3) displacement gradient H = ∂u/∂X at an integration point
    ///
    /// The out-of-plane components are zero in 2D (plane strain).
    pub fn displacement_gradient(&self, du_dx: &mut Matrix, uu: &Vector, p: usize) {
        du_dx.fill(0.0);
        let gg = &self.gradients[p];
        for m in 0..self.nnode {
            for i in 0..self.ndim {
                let u = uu[self.local_to_global[m * self.ndim + i]];
                for j in 0..self.ndim {
                    du_dx.add(i, j, u * gg.get(m, j));
                }
            }
        }
    }

    /// Calculates the local internal force vector
    ///
    /// ```text
    /// fᵐᵢ = Σₚ Pᵢⱼ Gᵐⱼ dVₚ
    /// ```
    pub fn calc_internal_force(
        &self,
        f_local: &mut Vector,
        uu: &Vector,
        model: &StressStrain,
        states: &StateArena,
    ) -> Result<(), StrError> {
        let mut du_dx = Matrix::new(3, 3);
        let mut pp = Matrix::new(3, 3);
        f_local.fill(0.0);
        for p in 0..self.n_integ_points() {
            let key = states.key(self.index, p)?;
            self.displacement_gradient(&mut du_dx, uu, p);
            model.piola_stress(&mut pp, &du_dx, states.get(key))?;
            let (gg, dv) = (&self.gradients[p], self.dvol[p]);
            for m in 0..self.nnode {
                for i in 0..self.ndim {
                    let mut sum = 0.0;
                    for j in 0..self.ndim {
                        sum += pp.get(i, j) * gg.get(m, j);
                    }
                    f_local[m * self.ndim + i] += sum * dv;
                }
            }
        }
        Ok(())
    }

    /// Calculates the local tangent stiffness matrix
    ///
    /// ```text
    /// Kᵐⁿᵢₖ = Σₚ Aᵢⱼₖₗ Gᵐⱼ Gⁿₗ dVₚ
    /// ```
    pub fn calc_stiffness(
        &self,
        kk_local: &mut Matrix,
        uu: &Vector,
        model: &StressStrain,
        states: &StateArena,
    ) -> Result<(), StrError> {
        let mut du_dx = Matrix::new(3, 3);
        let mut aa = Matrix::new(9, 9);
        kk_local.fill(0.0);
        let ndim = self.ndim;
        for p in 0..self.n_integ_points() {
            let key = states.key(self.index, p)?;
            self.displacement_gradient(&mut du_dx, uu, p);
            model.piola_stiffness(&mut aa, &du_dx, states.get(key))?;
            let (gg, dv) = (&self.gradients[p], self.dvol[p]);
            for m in 0..self.nnode {
                for i in 0..ndim {
                    for n in 0..self.nnode {
                        for k in 0..ndim {
                            let mut sum = 0.0;
                            for j in 0..ndim {
                                for l in 0..ndim {
                                    sum += aa.get(pair(i, j), pair(k, l)) * gg.get(m, j) * gg.get(n, l);
                                }
                            }
                            kk_local.add(m * ndim + i, n * ndim + k, sum * dv);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Calculates the local body force vector
    ///
    /// ```text
    /// fᵐᵢ = Σₚ Nᵐ bᵢ(x, t) dVₚ
    /// ```
    pub fn calc_body_force(&self, f_local: &mut Vector, coefficient: &Coefficient, t: f64) -> Result<(), StrError> {
        let mut b = vec![0.0; self.ndim];
        f_local.fill(0.0);
        for p in 0..self.n_integ_points() {
            coefficient.eval_vector(&mut b, &self.ip_coords[p], t)?;
            let (nn, dv) = (&self.interp[p], self.dvol[p]);
            for m in 0..self.nnode {
                for i in 0..self.ndim {
                    f_local[m * self.ndim + i] += nn[m] * b[i] * dv;
                }
            }
        }
        Ok(())
    }

    /// Updates the internal variables at all integration points
    pub fn commit(&self, uu: &Vector, model: &StressStrain, states: &mut StateArena) -> Result<(), StrError> {
        let mut du_dx = Matrix::new(3, 3);
        for p in 0..self.n_integ_points() {
            let key = states.key(self.index, p)?;
            self.displacement_gradient(&mut du_dx, uu, p);
            model.actual.commit(states.get_mut(key), &du_dx)?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
