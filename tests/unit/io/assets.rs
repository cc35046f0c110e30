//! Tests for asset naming and collection size discovery

#[cfg(test)]
mod tests {
    use crate::fixtures::{sample_table, write_layer, write_sample_assets};
    use std::path::Path;
    use tempfile::TempDir;
    use tokenator::io::assets::{asset_file_name, asset_path, layer_counts, max_collection_size};

    // Tests every kind of whitespace is removed from file names
    // Verified by only replacing spaces
    #[test]
    fn test_asset_file_name_strips_whitespace() {
        assert_eq!(asset_file_name("Light Blue Sample"), "LightBlueSample.png");
        assert_eq!(asset_file_name(" Tab\tSeparated "), "TabSeparated.png");
        assert_eq!(asset_file_name("Plain"), "Plain.png");
    }

    // Tests assets live under a per-category folder
    // Verified by joining option names directly to the assets root
    #[test]
    fn test_asset_path_layout() {
        let path = asset_path(Path::new("assets"), "body", "Yellow Sample");
        assert_eq!(path, Path::new("assets/body/YellowSample.png"));
    }

    // Tests the maximum is the product of images per folder
    // Verified by summing folder counts
    #[test]
    fn test_max_collection_size_product() {
        let temp = TempDir::new().unwrap();
        write_sample_assets(temp.path(), &sample_table());

        assert_eq!(max_collection_size(temp.path()).unwrap(), 27);
    }

    // Tests only image files in sub-folders are counted
    // Verified by counting every directory entry
    #[test]
    fn test_layer_counts_ignore_other_files() {
        let temp = TempDir::new().unwrap();
        write_layer(temp.path(), "background", "A", [0, 0, 0, 255]);
        write_layer(temp.path(), "background", "B", [0, 0, 0, 255]);
        write_layer(temp.path(), "body", "C", [0, 0, 0, 255]);
        std::fs::write(temp.path().join("body").join("notes.txt"), "draft").unwrap();
        std::fs::write(temp.path().join("README.txt"), "assets").unwrap();

        let counts = layer_counts(temp.path()).unwrap();

        assert_eq!(
            counts,
            vec![("background".to_string(), 2), ("body".to_string(), 1)]
        );
        assert_eq!(max_collection_size(temp.path()).unwrap(), 2);
    }

    // Tests an assets folder without categories allows nothing
    // Verified by returning the empty product
    #[test]
    fn test_empty_assets_dir() {
        let temp = TempDir::new().unwrap();
        assert_eq!(max_collection_size(temp.path()).unwrap(), 0);
    }

    // Tests unreadable asset roots surface an error
    // Verified by treating missing folders as empty
    #[test]
    fn test_missing_assets_dir() {
        assert!(layer_counts(Path::new("no/such/assets")).is_err());
    }
}
