//! Tests for PNG binarization and rendering

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use mrfdenoise::io::configuration::{BACKGROUND_COLOR, DEFAULT_THRESHOLD, FOREGROUND_COLOR};
    use mrfdenoise::io::image::{
        export_label_grid, label_grid_from_image, label_grid_to_image, load_label_grid,
    };
    use mrfdenoise::lattice::grid::{Coord, LabelGrid, NEGATIVE, POSITIVE};
    use tempfile::TempDir;

    // Tests dark opaque pixels become foreground
    // Verified by inverting the luma comparison
    #[test]
    fn test_binarize_by_luma() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([255, 255, 255, 255]));
        img.put_pixel(1, 0, Rgba([10, 10, 10, 255]));

        let grid = label_grid_from_image(&img, DEFAULT_THRESHOLD).expect("valid image");

        assert_eq!(grid.rows(), 1);
        assert_eq!(grid.cols(), 2);
        assert_eq!(grid.get(Coord::new(0, 0)), Some(NEGATIVE));
        assert_eq!(grid.get(Coord::new(0, 1)), Some(POSITIVE));
    }

    // Tests transparent pixels are background whatever their colour
    // Verified by ignoring alpha
    #[test]
    fn test_transparent_is_background() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]));
        let grid = label_grid_from_image(&img, DEFAULT_THRESHOLD).expect("valid image");

        assert_eq!(grid.get(Coord::new(0, 0)), Some(NEGATIVE));
    }

    // Tests empty images are rejected
    // Verified by skipping grid validation
    #[test]
    fn test_empty_image_rejected() {
        let img = RgbaImage::new(0, 0);
        assert!(label_grid_from_image(&img, DEFAULT_THRESHOLD).is_err());
    }

    // Tests rendering maps labels to the configured colours
    // Verified by swapping foreground and background
    #[test]
    fn test_render_colors() {
        let grid = LabelGrid::from_rows(&[[1, -1]]).expect("valid grid");
        let img = label_grid_to_image(&grid);

        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.get_pixel(0, 0).0, FOREGROUND_COLOR);
        assert_eq!(img.get_pixel(1, 0).0, BACKGROUND_COLOR);
    }

    // Tests exported grids load back unchanged
    // Verified by transposing on export
    #[test]
    fn test_export_then_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nested").join("grid.png");
        let grid = LabelGrid::from_rows(&[[1, -1, -1], [-1, 1, 1]]).expect("valid grid");

        export_label_grid(&grid, &path).expect("export succeeds");
        let loaded = load_label_grid(&path, DEFAULT_THRESHOLD).expect("load succeeds");

        assert_eq!(loaded, grid);
    }

    // Tests loading a missing file reports the path
    // Verified by returning an empty grid on failure
    #[test]
    fn test_load_missing_file() {
        let error = load_label_grid("does/not/exist.png", DEFAULT_THRESHOLD).expect_err("missing");
        assert!(error.to_string().contains("exist.png"));
    }
}
