//! Genus descriptors for the half-complex-to-complex (hc2c) kernel families.
//!
//! A genus tells the planner which kernels of a family it may offer for a composition step: a cheap
//! applicability predicate, the transform kind the kernels compute, and the vector granularity they
//! process per invocation. The predicate is only a pre-filter. Size, stride and alignment
//! restrictions belong to the kernels themselves.

use std::fmt;

/// The shape of transform a real-data kernel computes
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RdftKind {
    /// Real input, half-complex output (forward real FFT)
    R2HC,
    /// Half-complex input, real output (inverse real FFT)
    HC2R,
}

impl fmt::Display for RdftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::R2HC => f.write_str("r2hc"),
            Self::HC2R => f.write_str("hc2r"),
        }
    }
}

/// The arguments a genus predicate sees for one candidate kernel application.
///
/// `rp`/`ip` address the real and imaginary parts of the lower half-spectrum and `rm`/`im` the upper
/// half-spectrum, with row stride `rs`. The kernel would be applied for `m` in `mb..me`, with stride `ms`.
/// Pointers are type-erased so one predicate serves every scalar type.
#[derive(Copy, Clone, Debug)]
pub struct Hc2cCandidate {
    pub rp: *const (),
    pub ip: *const (),
    pub rm: *const (),
    pub im: *const (),
    pub rs: isize,
    pub mb: isize,
    pub me: isize,
    pub ms: isize,
}

impl Hc2cCandidate {
    #[allow(clippy::too_many_arguments)]
    pub fn new<T>(
        rp: *const T,
        ip: *const T,
        rm: *const T,
        im: *const T,
        rs: isize,
        mb: isize,
        me: isize,
        ms: isize,
    ) -> Self {
        Self {
            rp: rp as *const (),
            ip: ip as *const (),
            rm: rm as *const (),
            im: im as *const (),
            rs,
            mb,
            me,
            ms,
        }
    }
}

/// Applicability pre-filter for one kernel family
pub type Hc2cPredicate = fn(&Hc2cCandidate) -> bool;

/// Immutable metadata describing one hc2c kernel family
pub struct Hc2cGenus {
    okp: Hc2cPredicate,
    kind: RdftKind,
    vl: usize,
}

impl Hc2cGenus {
    /// Returns true if a kernel of this family may be offered for `candidate`
    #[inline]
    pub fn okp(&self, candidate: &Hc2cCandidate) -> bool {
        (self.okp)(candidate)
    }

    pub fn kind(&self) -> RdftKind {
        self.kind
    }

    /// How many vector elements a kernel of this family processes per invocation
    pub fn vl(&self) -> usize {
        self.vl
    }

    /// Returns true if the loop `mb..me` splits evenly into invocations of `vl` elements
    pub fn covers(&self, mb: isize, me: isize) -> bool {
        if me < mb {
            return false;
        }
        // the span of any ordered isize pair fits in a usize
        let span = (me as usize).wrapping_sub(mb as usize);
        span % self.vl == 0
    }
}

impl fmt::Debug for Hc2cGenus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hc2cGenus")
            .field("kind", &self.kind)
            .field("vl", &self.vl)
            .finish()
    }
}

// Both families accept every candidate. Feasibility is left to the kernel bodies.
fn okp(_candidate: &Hc2cCandidate) -> bool {
    true
}

/// Forward family: real input, half-complex output, one vector element per invocation
pub static HC2CF_GENUS: Hc2cGenus = Hc2cGenus {
    okp,
    kind: RdftKind::R2HC,
    vl: 1,
};

/// Backward family: half-complex input, real output, one vector element per invocation
pub static HC2CB_GENUS: Hc2cGenus = Hc2cGenus {
    okp,
    kind: RdftKind::HC2R,
    vl: 1,
};
