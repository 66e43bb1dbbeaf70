//! Interpolation and padding mode resolution.
//!
//! The two array families speak different resampling dialects: the host
//! family resamples through spline orders and ndimage-style padding names,
//! the tensor family through grid-sample interpolation and padding names.
//! [`resolves_modes`] translates whatever the caller supplies into the
//! vocabulary of the target family.
//!
//! Resolution is backed by a content-addressed table over the entire finite
//! mode space, built once on first use behind a `OnceLock` and read-only —
//! and therefore lock-free — afterwards. Equal inputs always map to equal
//! outputs; nothing ever invalidates the table mid-process.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::OnceLock;

use voxelaug_array::Backend;

use crate::error::GeometryError;

/// Interpolation modes of the tensor family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterpolateMode {
    /// Nearest neighbour.
    Nearest,
    /// Nearest neighbour with exact rounding.
    NearestExact,
    /// Linear, 1-D.
    Linear,
    /// Bilinear, 2-D.
    Bilinear,
    /// Trilinear, 3-D.
    Trilinear,
    /// Bicubic, 2-D.
    Bicubic,
    /// Area averaging.
    Area,
}

impl std::fmt::Display for InterpolateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InterpolateMode::Nearest => "nearest",
            InterpolateMode::NearestExact => "nearest-exact",
            InterpolateMode::Linear => "linear",
            InterpolateMode::Bilinear => "bilinear",
            InterpolateMode::Trilinear => "trilinear",
            InterpolateMode::Bicubic => "bicubic",
            InterpolateMode::Area => "area",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for InterpolateMode {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nearest" => Ok(InterpolateMode::Nearest),
            "nearest-exact" => Ok(InterpolateMode::NearestExact),
            "linear" => Ok(InterpolateMode::Linear),
            "bilinear" => Ok(InterpolateMode::Bilinear),
            "trilinear" => Ok(InterpolateMode::Trilinear),
            "bicubic" => Ok(InterpolateMode::Bicubic),
            "area" => Ok(InterpolateMode::Area),
            other => Err(GeometryError::UnsupportedMode(other.to_string())),
        }
    }
}

/// Spline interpolation orders of the host family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplineMode {
    /// Order 0 (nearest).
    Zero,
    /// Order 1 (linear).
    One,
    /// Order 2 (quadratic).
    Two,
    /// Order 3 (cubic).
    Three,
    /// Order 4.
    Four,
    /// Order 5.
    Five,
}

impl SplineMode {
    /// The numeric spline order.
    pub fn order(&self) -> u8 {
        match self {
            SplineMode::Zero => 0,
            SplineMode::One => 1,
            SplineMode::Two => 2,
            SplineMode::Three => 3,
            SplineMode::Four => 4,
            SplineMode::Five => 5,
        }
    }

    fn all() -> [SplineMode; 6] {
        [
            SplineMode::Zero,
            SplineMode::One,
            SplineMode::Two,
            SplineMode::Three,
            SplineMode::Four,
            SplineMode::Five,
        ]
    }
}

impl std::fmt::Display for SplineMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.order())
    }
}

impl FromStr for SplineMode {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(SplineMode::Zero),
            "1" => Ok(SplineMode::One),
            "2" => Ok(SplineMode::Two),
            "3" => Ok(SplineMode::Three),
            "4" => Ok(SplineMode::Four),
            "5" => Ok(SplineMode::Five),
            other => Err(GeometryError::UnsupportedMode(other.to_string())),
        }
    }
}

/// Padding modes of the tensor family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridSamplePadMode {
    /// Pad with zeros.
    Zeros,
    /// Repeat the border value.
    Border,
    /// Reflect about the border.
    Reflection,
}

impl std::fmt::Display for GridSamplePadMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GridSamplePadMode::Zeros => "zeros",
            GridSamplePadMode::Border => "border",
            GridSamplePadMode::Reflection => "reflection",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for GridSamplePadMode {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zeros" => Ok(GridSamplePadMode::Zeros),
            "border" => Ok(GridSamplePadMode::Border),
            "reflection" => Ok(GridSamplePadMode::Reflection),
            other => Err(GeometryError::UnsupportedMode(other.to_string())),
        }
    }
}

/// Padding modes of the host family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NdimagePadMode {
    /// Constant fill.
    Constant,
    /// Constant fill beyond the grid.
    GridConstant,
    /// Repeat the nearest value.
    Nearest,
    /// Reflect excluding the border sample.
    Reflect,
    /// Reflect including the border sample.
    Mirror,
    /// Grid-aligned mirror.
    GridMirror,
    /// Wrap around.
    Wrap,
    /// Grid-aligned wrap.
    GridWrap,
}

impl std::fmt::Display for NdimagePadMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NdimagePadMode::Constant => "constant",
            NdimagePadMode::GridConstant => "grid-constant",
            NdimagePadMode::Nearest => "nearest",
            NdimagePadMode::Reflect => "reflect",
            NdimagePadMode::Mirror => "mirror",
            NdimagePadMode::GridMirror => "grid-mirror",
            NdimagePadMode::Wrap => "wrap",
            NdimagePadMode::GridWrap => "grid-wrap",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for NdimagePadMode {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "constant" => Ok(NdimagePadMode::Constant),
            "grid-constant" => Ok(NdimagePadMode::GridConstant),
            "nearest" => Ok(NdimagePadMode::Nearest),
            "reflect" => Ok(NdimagePadMode::Reflect),
            "mirror" => Ok(NdimagePadMode::Mirror),
            "grid-mirror" => Ok(NdimagePadMode::GridMirror),
            "wrap" => Ok(NdimagePadMode::Wrap),
            "grid-wrap" => Ok(NdimagePadMode::GridWrap),
            other => Err(GeometryError::UnsupportedMode(other.to_string())),
        }
    }
}

/// Interpolation mode resolved for a target family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolvedInterp {
    /// A host-family spline order.
    Spline(SplineMode),
    /// A tensor-family interpolation mode.
    Interpolate(InterpolateMode),
}

/// Padding mode resolved for a target family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolvedPad {
    /// A host-family padding mode.
    Ndimage(NdimagePadMode),
    /// A tensor-family padding mode.
    GridSample(GridSamplePadMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum InterpInput {
    Spline(SplineMode),
    Interpolate(InterpolateMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum PadInput {
    Ndimage(NdimagePadMode),
    GridSample(GridSamplePadMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ModeKey {
    interp: InterpInput,
    pad: PadInput,
    backend: Backend,
    spatial_nd: u8,
}

fn parse_interp(s: &str) -> Result<InterpInput, GeometryError> {
    if let Ok(spline) = s.parse::<SplineMode>() {
        return Ok(InterpInput::Spline(spline));
    }
    Ok(InterpInput::Interpolate(s.parse::<InterpolateMode>()?))
}

fn parse_pad(s: &str) -> Result<PadInput, GeometryError> {
    if let Ok(nd) = s.parse::<NdimagePadMode>() {
        return Ok(PadInput::Ndimage(nd));
    }
    Ok(PadInput::GridSample(s.parse::<GridSamplePadMode>()?))
}

fn to_host_interp(interp: InterpInput) -> ResolvedInterp {
    match interp {
        InterpInput::Spline(m) => ResolvedInterp::Spline(m),
        InterpInput::Interpolate(m) => ResolvedInterp::Spline(match m {
            InterpolateMode::Nearest | InterpolateMode::NearestExact | InterpolateMode::Area => {
                SplineMode::Zero
            }
            InterpolateMode::Linear | InterpolateMode::Bilinear | InterpolateMode::Trilinear => {
                SplineMode::One
            }
            InterpolateMode::Bicubic => SplineMode::Three,
        }),
    }
}

fn to_host_pad(pad: PadInput) -> ResolvedPad {
    match pad {
        PadInput::Ndimage(m) => ResolvedPad::Ndimage(m),
        PadInput::GridSample(m) => ResolvedPad::Ndimage(match m {
            GridSamplePadMode::Zeros => NdimagePadMode::Constant,
            GridSamplePadMode::Border => NdimagePadMode::Nearest,
            GridSamplePadMode::Reflection => NdimagePadMode::Reflect,
        }),
    }
}

fn to_tensor_interp(interp: InterpInput, spatial_nd: u8) -> Option<ResolvedInterp> {
    let mode = match interp {
        InterpInput::Interpolate(m) => m,
        InterpInput::Spline(s) => match s {
            SplineMode::Zero => InterpolateMode::NearestExact,
            SplineMode::One => InterpolateMode::Linear,
            SplineMode::Three => InterpolateMode::Bicubic,
            // no grid-sample equivalent for the remaining spline orders
            SplineMode::Two | SplineMode::Four | SplineMode::Five => return None,
        },
    };
    let mode = match mode {
        InterpolateMode::Linear | InterpolateMode::Bilinear | InterpolateMode::Trilinear => {
            match spatial_nd {
                1 => InterpolateMode::Linear,
                3 => InterpolateMode::Trilinear,
                _ => InterpolateMode::Bilinear,
            }
        }
        other => other,
    };
    Some(ResolvedInterp::Interpolate(mode))
}

fn to_tensor_pad(pad: PadInput) -> ResolvedPad {
    match pad {
        PadInput::GridSample(m) => ResolvedPad::GridSample(m),
        PadInput::Ndimage(m) => ResolvedPad::GridSample(match m {
            NdimagePadMode::Constant | NdimagePadMode::GridConstant => GridSamplePadMode::Zeros,
            NdimagePadMode::Nearest => GridSamplePadMode::Border,
            NdimagePadMode::Reflect
            | NdimagePadMode::Mirror
            | NdimagePadMode::GridMirror
            | NdimagePadMode::Wrap
            | NdimagePadMode::GridWrap => GridSamplePadMode::Reflection,
        }),
    }
}

fn all_interp_inputs() -> Vec<InterpInput> {
    let mut inputs: Vec<InterpInput> = SplineMode::all()
        .into_iter()
        .map(InterpInput::Spline)
        .collect();
    inputs.extend(
        [
            InterpolateMode::Nearest,
            InterpolateMode::NearestExact,
            InterpolateMode::Linear,
            InterpolateMode::Bilinear,
            InterpolateMode::Trilinear,
            InterpolateMode::Bicubic,
            InterpolateMode::Area,
        ]
        .into_iter()
        .map(InterpInput::Interpolate),
    );
    inputs
}

fn all_pad_inputs() -> Vec<PadInput> {
    let mut inputs: Vec<PadInput> = [
        NdimagePadMode::Constant,
        NdimagePadMode::GridConstant,
        NdimagePadMode::Nearest,
        NdimagePadMode::Reflect,
        NdimagePadMode::Mirror,
        NdimagePadMode::GridMirror,
        NdimagePadMode::Wrap,
        NdimagePadMode::GridWrap,
    ]
    .into_iter()
    .map(PadInput::Ndimage)
    .collect();
    inputs.extend(
        [
            GridSamplePadMode::Zeros,
            GridSamplePadMode::Border,
            GridSamplePadMode::Reflection,
        ]
        .into_iter()
        .map(PadInput::GridSample),
    );
    inputs
}

fn build_mode_table() -> HashMap<ModeKey, (ResolvedInterp, ResolvedPad)> {
    let mut table = HashMap::new();
    for interp in all_interp_inputs() {
        for pad in all_pad_inputs() {
            for spatial_nd in 1..=3u8 {
                table.insert(
                    ModeKey {
                        interp,
                        pad,
                        backend: Backend::HostArray,
                        spatial_nd,
                    },
                    (to_host_interp(interp), to_host_pad(pad)),
                );
                if let Some(resolved) = to_tensor_interp(interp, spatial_nd) {
                    table.insert(
                        ModeKey {
                            interp,
                            pad,
                            backend: Backend::Tensor,
                            spatial_nd,
                        },
                        (resolved, to_tensor_pad(pad)),
                    );
                }
            }
        }
    }
    table
}

static MODE_TABLE: OnceLock<HashMap<ModeKey, (ResolvedInterp, ResolvedPad)>> = OnceLock::new();

/// Adjusts interpolation and padding mode names to the target family.
///
/// When `backend` is `None`, the target is inferred: a spline-order
/// interpolation name selects the host family, anything else the tensor
/// family. `spatial_nd` disambiguates the "linear" modes of the tensor
/// family (1 → linear, 3 → trilinear, otherwise bilinear).
///
/// # Examples
///
/// ```rust
/// use voxelaug_array::Backend;
/// use voxelaug_geometry::modes::{resolves_modes, ResolvedInterp, SplineMode};
///
/// let (backend, _interp, _pad) = resolves_modes("bilinear", "zeros", None, 2).unwrap();
/// assert_eq!(backend, Backend::Tensor);
///
/// let (backend, interp, _pad) =
///     resolves_modes("1", "reflect", Some(Backend::HostArray), 2).unwrap();
/// assert_eq!(backend, Backend::HostArray);
/// assert_eq!(interp, ResolvedInterp::Spline(SplineMode::One));
/// ```
pub fn resolves_modes(
    interp_mode: &str,
    padding_mode: &str,
    backend: Option<Backend>,
    spatial_nd: usize,
) -> Result<(Backend, ResolvedInterp, ResolvedPad), GeometryError> {
    let interp = parse_interp(interp_mode)?;
    let pad = parse_pad(padding_mode)?;
    let backend = backend.unwrap_or(match interp {
        InterpInput::Spline(_) => Backend::HostArray,
        InterpInput::Interpolate(_) => Backend::Tensor,
    });
    let spatial_nd = match spatial_nd {
        1 => 1u8,
        3 => 3,
        _ => 2,
    };
    let key = ModeKey {
        interp,
        pad,
        backend,
        spatial_nd,
    };
    let (resolved_interp, resolved_pad) = MODE_TABLE
        .get_or_init(build_mode_table)
        .get(&key)
        .copied()
        .ok_or_else(|| {
            GeometryError::UnsupportedMode(format!(
                "{} / {} for the {} backend",
                interp_mode, padding_mode, backend
            ))
        })?;
    Ok((backend, resolved_interp, resolved_pad))
}
