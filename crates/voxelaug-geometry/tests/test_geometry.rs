//! Cross-module checks: matrices applied to grids, across both families.

use approx::assert_relative_eq;

use voxelaug_array::{Backend, Device};
use voxelaug_geometry::{
    create_grid, create_rotate, create_scale, create_translate, scale_affine, GeometryError,
};

#[test]
fn test_scale_then_translate_composition() -> Result<(), GeometryError> {
    let scale = create_scale(2, &[2.0, 3.0]);
    let translate = create_translate(2, &[1.0, -1.0]);
    // translate ∘ scale: the point scales first
    let composed = translate.matmul(&scale)?;
    assert_eq!(composed.transform_point(&[1.0, 1.0])?, vec![3.0, 2.0]);
    // homogeneous row survives composition
    assert_eq!(&composed.as_slice()[6..], &[0.0, 0.0, 1.0]);
    Ok(())
}

#[test]
fn test_rotation_preserves_grid_extent() -> Result<(), GeometryError> {
    let grid = create_grid::<f64>(&[3, 3], None, true, Backend::HostArray, Device::Cpu)?;
    let rot = create_rotate(2, &[std::f64::consts::FRAC_PI_2])?;

    let data = grid.as_slice();
    let numel = 9;
    for flat in 0..numel {
        let p = [data[flat], data[numel + flat]];
        let q = rot.transform_point(&p)?;
        // a quarter turn permutes the centered lattice onto itself
        assert_relative_eq!(q[0] * q[0] + q[1] * q[1], p[0] * p[0] + p[1] * p[1], epsilon = 1e-12);
        assert!(q.iter().all(|v| v.abs() < 1.0 + 1e-12));
    }
    Ok(())
}

#[test]
fn test_grid_matrix_pipeline_matches_across_families() -> Result<(), GeometryError> {
    let affine = scale_affine(&[8, 8], &[4, 4], true);
    let host = create_grid::<f64>(&[4, 4], None, true, Backend::HostArray, Device::Cpu)?;
    let tensor = create_grid::<f64>(&[4, 4], None, true, Backend::Tensor, Device::Cpu)?;

    let numel = 16;
    let (h, t) = (host.as_slice(), tensor.as_slice());
    for flat in 0..numel {
        let hp = affine.transform_point(&[h[flat], h[numel + flat]])?;
        let tp = affine.transform_point(&[t[flat], t[numel + flat]])?;
        assert_eq!(hp, tp);
    }
    Ok(())
}

#[test]
fn test_affine_materialises_into_both_families() -> Result<(), GeometryError> {
    let m = create_rotate(3, &[0.1, 0.2, 0.3])?;
    let host = m.into_array(Backend::HostArray, Device::Cpu)?;
    let tensor = m.into_array(Backend::Tensor, Device::cuda(0))?;
    assert_eq!(host.shape(), &[4, 4]);
    assert_eq!(host.as_slice(), tensor.as_slice());
    assert_eq!(tensor.device(), Device::cuda(0));
    // last row is the homogeneous row in either family
    assert_eq!(&host.as_slice()[12..], &[0.0, 0.0, 0.0, 1.0]);
    Ok(())
}
