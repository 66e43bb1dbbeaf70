//! The two families must be interchangeable behind the capability trait.

use voxelaug_array::{
    index::{nonzero, unravel_index},
    ArrayError, Backend, BackendArray, Device, DeviceTensor, HostArray, NumericBackend,
};

fn checkerboard(dim: usize) -> Vec<f32> {
    (0..dim * dim)
        .map(|i| ((i / dim + i % dim) % 2) as f32)
        .collect()
}

fn exercise<B>(arr: &B) -> (Vec<usize>, Vec<bool>)
where
    B: NumericBackend<Elem = f32>,
{
    let mask = arr.compare(|v| v > 0.5);
    let fg = nonzero(&mask);
    let any = arr.any_axis0(|v| v > 0.5).unwrap();
    (fg, any)
}

#[test]
fn test_families_share_one_numeric_surface() -> Result<(), ArrayError> {
    let data = checkerboard(8);
    let host = HostArray::from_shape_vec(&[1, 8, 8], data.clone(), Device::Cpu)?;
    let tensor = DeviceTensor::from_shape_vec(&[1, 8, 8], data, Device::cuda(0))?;

    assert_eq!(exercise(&host), exercise(&tensor));
    assert_eq!(host.spatial_shape(), tensor.spatial_shape());
    assert_eq!(host.spatial_numel(), 64);
    Ok(())
}

#[test]
fn test_roundtrip_is_lossless() -> Result<(), ArrayError> {
    let values = vec![f64::MIN_POSITIVE, -0.0, 1.0 / 3.0, f64::MAX];
    let host = HostArray::from_shape_vec(&[1, 4], values.clone(), Device::Cpu)?;
    let tensor: DeviceTensor<f64> = host.convert(Device::cuda(0))?;
    let back: HostArray<f64> = tensor.convert(Device::Cpu)?;
    for (a, b) in values.iter().zip(back.as_slice().iter()) {
        assert_eq!(a.to_bits(), b.to_bits());
    }
    Ok(())
}

#[test]
fn test_union_selects_family_once() -> Result<(), ArrayError> {
    for backend in [Backend::HostArray, Backend::Tensor] {
        let arr =
            BackendArray::from_shape_vec(backend, &[2, 3], vec![0u8; 6], Device::Cpu)?;
        assert_eq!(arr.backend(), backend);
        assert_eq!(arr.shape(), &[2, 3]);
    }
    Ok(())
}

#[test]
fn test_flat_indices_address_spatial_positions() -> Result<(), ArrayError> {
    let mut data = vec![0.0f32; 2 * 4 * 5];
    // channel 1, spatial position (2, 3)
    data[20 + 2 * 5 + 3] = 7.0;
    let vol = HostArray::from_shape_vec(&[2, 4, 5], data, Device::Cpu)?;
    let mask = vol.any_axis0(|v| v > 0.0)?;
    let flat = nonzero(&mask);
    assert_eq!(flat, vec![13]);
    assert_eq!(unravel_index(flat[0], vol.spatial_shape()), vec![2, 3]);
    Ok(())
}
