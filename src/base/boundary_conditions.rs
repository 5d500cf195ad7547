use super::{Coefficient, Space};
use crate::StrError;
use russell_lab::Vector;
use std::collections::BTreeMap;
use std::fmt;

/// Holds an essential (Dirichlet) boundary condition
#[derive(Debug)]
pub struct EssentialBc {
    /// Boundary markers
    pub markers: Vec<i32>,

    /// Prescribed displacement: vector if component is None, scalar otherwise
    pub coefficient: Coefficient,

    /// Constrained component (None means all components)
    pub component: Option<usize>,
}

/// Holds a natural boundary condition or a volume load
#[derive(Debug)]
pub enum NaturalBc {
    /// Traction in the reference configuration
    Traction {
        /// Boundary markers
        markers: Vec<i32>,

        /// Traction: vector if component is None, scalar otherwise
        coefficient: Coefficient,

        /// Loaded component (None means all components)
        component: Option<usize>,
    },

    /// Pressure acting against the outward normal of the reference configuration
    Pressure {
        /// Boundary markers
        markers: Vec<i32>,

        /// Pressure (scalar)
        coefficient: Coefficient,
    },

    /// Force per unit reference volume
    BodyForce {
        /// Body force (vector)
        coefficient: Coefficient,
    },
}

/// Defines non-fatal problems found while resolving the essential boundary conditions
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BcWarning {
    /// The component of a constrained degree of freedom differs from the requested component
    ComponentMismatch {
        /// True degree of freedom
        dof: usize,

        /// Requested component
        requested: usize,

        /// Component of the degree of freedom
        found: usize,
    },

    /// Two conditions with different component specifications constrain the same degree of freedom
    OverlappingComponents {
        /// True degree of freedom
        dof: usize,

        /// Component of the previously registered condition
        previous: Option<usize>,

        /// Component of the condition registered last (which prescribes the value)
        current: Option<usize>,
    },
}

/// Holds the resolved essential degrees of freedom
#[derive(Clone, Debug)]
pub struct EssentialDofs {
    /// Constrained true degrees of freedom (sorted and unique)
    pub dofs: Vec<usize>,

    /// Index of the condition that prescribes the value of each constrained degree of freedom
    pub sources: Vec<usize>,

    /// Indicates whether a true degree of freedom is constrained or not (true_size)
    pub flags: Vec<bool>,
}

/// Holds all boundary conditions
#[derive(Debug)]
pub struct BoundaryConditions {
    /// Essential conditions
    pub essential: Vec<EssentialBc>,

    /// Natural conditions and volume loads
    pub natural: Vec<NaturalBc>,

    /// Warnings found by the last call to resolve
    warnings: Vec<BcWarning>,
}

impl BoundaryConditions {
    /// Allocates a new instance
    pub fn new() -> Self {
        BoundaryConditions {
            essential: Vec::new(),
            natural: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an essential condition
    ///
    /// The markers are resolved by [BoundaryConditions::resolve] once the space is finalized.
    pub fn add_essential(&mut self, markers: &[i32], coefficient: Coefficient, component: Option<usize>) -> &mut Self {
        self.essential.push(EssentialBc {
            markers: markers.to_vec(),
            coefficient,
            component,
        });
        self
    }

    /// Adds a natural (traction) condition
    ///
    /// Natural conditions enter the boundary integrals and never constrain degrees of freedom.
    pub fn add_natural(&mut self, markers: &[i32], coefficient: Coefficient, component: Option<usize>) -> &mut Self {
        self.natural.push(NaturalBc::Traction {
            markers: markers.to_vec(),
            coefficient,
            component,
        });
        self
    }

    /// Adds a pressure condition
    pub fn add_pressure(&mut self, markers: &[i32], coefficient: Coefficient) -> &mut Self {
        self.natural.push(NaturalBc::Pressure {
            markers: markers.to_vec(),
            coefficient,
        });
        self
    }

    /// Adds a body force
    pub fn add_body_force(&mut self, coefficient: Coefficient) -> &mut Self {
        self.natural.push(NaturalBc::BodyForce { coefficient });
        self
    }

    /// Returns the warnings found by the last call to resolve
    pub fn warnings(&self) -> &[BcWarning] {
        &self.warnings
    }

    /// Checks the coefficient variants and components
    pub fn validate(&self, ndim: usize) -> Result<(), StrError> {
        for bc in &self.essential {
            match bc.component {
                None => {
                    if bc.coefficient.is_scalar() {
                        return Err("essential condition on all components requires a vector coefficient");
                    }
                }
                Some(c) => {
                    if c >= ndim {
                        return Err("essential condition component must be smaller than ndim");
                    }
                    if !bc.coefficient.is_scalar() {
                        return Err("essential condition on a single component requires a scalar coefficient");
                    }
                }
            }
        }
        for bc in &self.natural {
            match bc {
                NaturalBc::Traction {
                    coefficient, component, ..
                } => match component {
                    None => {
                        if coefficient.is_scalar() {
                            return Err("traction on all components requires a vector coefficient");
                        }
                    }
                    Some(c) => {
                        if *c >= ndim {
                            return Err("traction component must be smaller than ndim");
                        }
                        if !coefficient.is_scalar() {
                            return Err("traction on a single component requires a scalar coefficient");
                        }
                    }
                },
                NaturalBc::Pressure { coefficient, .. } => {
                    if !coefficient.is_scalar() {
                        return Err("pressure requires a scalar coefficient");
                    }
                }
                NaturalBc::BodyForce { coefficient } => {
                    if coefficient.is_scalar() {
                        return Err("body force requires a vector coefficient");
                    }
                }
            }
        }
        Ok(())
    }

    /// Resolves the essential conditions into a sorted and unique list of true degrees of freedom
    ///
    /// When conditions overlap, the condition registered last prescribes the value.
    pub fn resolve(&mut self, space: &dyn Space) -> Result<EssentialDofs, StrError> {
        self.validate(space.ndim())?;
        self.warnings.clear();
        let mut sources: BTreeMap<usize, (usize, Option<usize>)> = BTreeMap::new();
        for (index, bc) in self.essential.iter().enumerate() {
            let dofs = space.resolve_boundary_dofs(&bc.markers, bc.component)?;
            for dof in dofs {
                if dof >= space.true_size() {
                    return Err("resolved degree of freedom is out of bounds");
                }
                if let Some(requested) = bc.component {
                    let found = space.dof_component(dof);
                    if found != requested {
                        self.warnings.push(BcWarning::ComponentMismatch { dof, requested, found });
                    }
                }
                if let Some((_, previous)) = sources.insert(dof, (index, bc.component)) {
                    if previous != bc.component {
                        self.warnings.push(BcWarning::OverlappingComponents {
                            dof,
                            previous,
                            current: bc.component,
                        });
                    }
                }
            }
        }
        let mut flags = vec![false; space.true_size()];
        let mut dofs = Vec::with_capacity(sources.len());
        let mut bc_indices = Vec::with_capacity(sources.len());
        for (dof, (index, _)) in sources {
            flags[dof] = true;
            dofs.push(dof);
            bc_indices.push(index);
        }
        Ok(EssentialDofs {
            dofs,
            sources: bc_indices,
            flags,
        })
    }
}

impl EssentialDofs {
    /// Returns the number of constrained degrees of freedom
    pub fn len(&self) -> usize {
        self.dofs.len()
    }

    /// Returns true if there are no constrained degrees of freedom
    pub fn is_empty(&self) -> bool {
        self.dofs.is_empty()
    }

    /// Writes the prescribed values at time t into the constrained entries of a true vector
    ///
    /// The other entries are not modified.
    pub fn prescribed_values(
        &self,
        values: &mut Vector,
        bcs: &BoundaryConditions,
        space: &dyn Space,
        t: f64,
    ) -> Result<(), StrError> {
        let mut buffer = vec![0.0; space.ndim()];
        for (dof, index) in self.dofs.iter().zip(&self.sources) {
            let bc = bcs.essential.get(*index).ok_or("essential condition index is out of bounds")?;
            let x = space.node_coords(space.dof_node(*dof));
            values[*dof] = bc.coefficient.eval_component(&mut buffer, space.dof_component(*dof), x, t)?;
        }
        Ok(())
    }
}

impl fmt::Display for BcWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BcWarning::ComponentMismatch { dof, requested, found } => write!(
                f,
                "dof {} has component {} but component {} was requested; the dof is constrained anyway",
                dof, found, requested
            ),
            BcWarning::OverlappingComponents {
                dof,
                previous,
                current,
            } => write!(
                f,
                "dof {} is constrained by conditions with components {:?} and {:?}; the last one prescribes the value",
                dof, previous, current
            ),
        }
    }
}

impl fmt::Display for BoundaryConditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Essential boundary conditions\n")?;
        write!(f, "=============================\n")?;
        for bc in &self.essential {
            write!(f, "markers = {:?}, component = {:?}\n", bc.markers, bc.component)?;
        }
        write!(f, "\nNatural boundary conditions\n")?;
        write!(f, "===========================\n")?;
        for bc in &self.natural {
            match bc {
                NaturalBc::Traction { markers, component, .. } => {
                    write!(f, "traction: markers = {:?}, component = {:?}\n", markers, component)?
                }
                NaturalBc::Pressure { markers, .. } => write!(f, "pressure: markers = {:?}\n", markers)?,
                NaturalBc::BodyForce { .. } => write!(f, "body force\n")?,
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
