//! Draws class-balanced crop centers from a synthetic label volume and
//! reports the foreground bounding box and a matching resampling grid.

use voxelaug::array::{Backend, Device, HostArray, NumericBackend};
use voxelaug::geometry::{create_grid, scale_affine};
use voxelaug::sampling::{
    generate_label_classes_crop_centers, generate_spatial_bounding_box, is_positive,
    map_classes_to_indices, SeededRng,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // a 32x32 label: class 1 square in the middle, class 2 blob in a corner
    let mut data = vec![0.0f32; 32 * 32];
    for r in 10..22 {
        for c in 10..22 {
            data[r * 32 + c] = 1.0;
        }
    }
    for r in 0..5 {
        for c in 0..5 {
            data[r * 32 + c] = 2.0;
        }
    }
    let label = HostArray::from_shape_vec(&[1, 32, 32], data, Device::Cpu)?;

    let per_class = map_classes_to_indices(&label, Some(3), None, 0.0, None)?;
    for (class, indices) in per_class.iter().enumerate() {
        log::info!("class {}: {} candidate voxels", class, indices.len());
    }

    let mut rng = SeededRng::seed(42);
    let centers = generate_label_classes_crop_centers(
        &[8, 8],
        6,
        &[32, 32],
        &per_class,
        Some(&[0.0, 2.0, 1.0]),
        &mut rng,
        false,
        true,
    )?;
    println!("crop centers: {:?}", centers);

    let (start, end) = generate_spatial_bounding_box(&label, is_positive, None, &[1], true)?;
    println!("foreground bounding box: {:?} .. {:?}", start, end);

    let affine = scale_affine(&[32, 32], &[8, 8], true);
    let grid = create_grid::<f32>(&[8, 8], None, true, Backend::HostArray, Device::Cpu)?;
    println!(
        "resampling an {:?} grid through {:?}",
        grid.shape(),
        &affine.as_slice()[..3]
    );

    Ok(())
}
