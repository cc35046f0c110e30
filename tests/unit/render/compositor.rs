//! Tests for layer planning, alpha compositing and token export

#[cfg(test)]
mod tests {
    use crate::fixtures::{LAYER_SIZE, sample_table, write_layer, write_sample_assets};
    use image::{Rgb, Rgba, RgbaImage};
    use tempfile::TempDir;
    use tokenator::TokenatorError;
    use tokenator::generation::character::{Character, Collection};
    use tokenator::render::compositor::{
        alpha_composite, character_label, plan_layers, render, render_collection, save_token,
        token_path,
    };

    fn numbered(pairs: &[(&str, &str)]) -> Collection {
        let mut collection = Collection::from_characters(vec![Character::from_pairs(pairs)]);
        collection.assign_ids().unwrap();
        collection
    }

    // Tests three categories plan exactly three layers, background first
    // Verified by planning layers in character order
    #[test]
    fn test_plan_layers_order() {
        let character = Character::from_pairs(&[
            ("face", "Red Apathetic Sample"),
            ("background", "RGB Sample"),
            ("body", "Yellow Sample"),
        ]);
        let assets = std::path::Path::new("assets");

        let layers = plan_layers(&character, &["background", "body", "face"], assets).unwrap();

        let categories: Vec<&str> = layers.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(categories, vec!["background", "body", "face"]);
        assert_eq!(layers[0].1, assets.join("background").join("RGBSample.png"));
        assert_eq!(layers[2].1, assets.join("face").join("RedApatheticSample.png"));
    }

    // Tests opaque layers replace and transparent layers preserve the base
    // Verified by swapping source and destination
    #[test]
    fn test_alpha_composite_extremes() {
        let mut base = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 255, 255]));
        let mut layer = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 0]));
        layer.put_pixel(0, 0, Rgba([255, 0, 0, 255]));

        alpha_composite(&mut base, &layer);

        assert_eq!(*base.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*base.get_pixel(1, 0), Rgba([0, 0, 255, 255]));
    }

    // Tests half-transparent layers blend with the base
    // Verified by ignoring destination alpha
    #[test]
    fn test_alpha_composite_blend() {
        let mut base = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 255, 255]));
        let layer = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 128]));

        alpha_composite(&mut base, &layer);

        let Rgba([r, g, b, a]) = *base.get_pixel(0, 0);
        assert!((i32::from(r) - 128).abs() <= 1, "red {r}");
        assert_eq!(g, 0);
        assert!((i32::from(b) - 127).abs() <= 1, "blue {b}");
        assert!(a >= 254, "alpha {a}");
    }

    // Tests compositing onto a transparent base keeps the layer colour
    // Verified by premultiplying without dividing by output alpha
    #[test]
    fn test_alpha_composite_transparent_base() {
        let mut base = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]));
        let expected = [10, 200, 30, 100];
        let layer = RgbaImage::from_pixel(1, 1, Rgba(expected));

        alpha_composite(&mut base, &layer);

        let Rgba(found) = *base.get_pixel(0, 0);
        for (channel, want) in found.into_iter().zip(expected) {
            assert!((i32::from(channel) - i32::from(want)).abs() <= 1, "{found:?}");
        }
    }

    // Tests later layers are drawn over earlier ones
    // Verified by reversing the layer order
    #[test]
    fn test_render_layers_in_order() {
        let temp = TempDir::new().unwrap();
        let assets = temp.path();
        write_layer(assets, "background", "Sky", [0, 0, 255, 255]);
        write_layer(assets, "body", "Green", [0, 255, 0, 255]);
        let mut face = RgbaImage::from_pixel(LAYER_SIZE, LAYER_SIZE, Rgba([0, 0, 0, 0]));
        face.put_pixel(1, 1, Rgba([255, 0, 0, 255]));
        std::fs::create_dir_all(assets.join("face")).unwrap();
        face.save(assets.join("face").join("Red.png")).unwrap();

        let character =
            Character::from_pairs(&[("background", "Sky"), ("body", "Green"), ("face", "Red")]);
        let image = render(&character, &["background", "body", "face"], assets).unwrap();

        assert_eq!(image.dimensions(), (LAYER_SIZE, LAYER_SIZE));
        assert_eq!(*image.get_pixel(0, 0), Rgb([0, 255, 0]));
        assert_eq!(*image.get_pixel(1, 1), Rgb([255, 0, 0]));
    }

    // Tests whitespace in option names is dropped when resolving assets
    // Verified by keeping spaces in asset file names
    #[test]
    fn test_render_strips_whitespace() {
        let temp = TempDir::new().unwrap();
        let path = write_layer(temp.path(), "background", "Light Blue Sample", [1, 2, 3, 255]);
        assert!(path.ends_with("LightBlueSample.png"));

        let character = Character::from_pairs(&[("background", "Light Blue Sample")]);
        let image = render(&character, &["background"], temp.path()).unwrap();
        assert_eq!(*image.get_pixel(0, 0), Rgb([1, 2, 3]));
    }

    // Tests missing assets name the character, category and path
    // Verified by returning a generic error
    #[test]
    fn test_render_missing_asset() {
        let temp = TempDir::new().unwrap();
        write_layer(temp.path(), "background", "Sky", [0, 0, 255, 255]);
        let collection = numbered(&[("background", "Sky"), ("body", "Ghost")]);
        let character = &collection.characters()[0];

        let error = render(character, &["background", "body"], temp.path()).unwrap_err();

        assert!(error.to_string().contains("Token #0"));
        match error {
            TokenatorError::AssetLoad {
                character,
                category,
                path,
                ..
            } => {
                assert_eq!(character, "#0");
                assert_eq!(category, "body");
                assert!(path.ends_with("body/Ghost.png"));
            }
            other => panic!("Expected AssetLoad, got {other:?}"),
        }
    }

    // Tests layers must match the background size
    // Verified by cropping mismatched layers silently
    #[test]
    fn test_render_size_mismatch() {
        let temp = TempDir::new().unwrap();
        write_layer(temp.path(), "background", "Sky", [0, 0, 255, 255]);
        std::fs::create_dir_all(temp.path().join("body")).unwrap();
        RgbaImage::from_pixel(LAYER_SIZE + 1, LAYER_SIZE, Rgba([0, 0, 0, 0]))
            .save(temp.path().join("body").join("Wide.png"))
            .unwrap();

        let character = Character::from_pairs(&[("background", "Sky"), ("body", "Wide")]);
        let result = render(&character, &["background", "body"], temp.path());

        match result {
            Err(TokenatorError::LayerSizeMismatch {
                expected, found, ..
            }) => {
                assert_eq!(expected, (LAYER_SIZE, LAYER_SIZE));
                assert_eq!(found, (LAYER_SIZE + 1, LAYER_SIZE));
            }
            other => panic!("Expected LayerSizeMismatch, got {other:?}"),
        }
    }

    // Tests unnumbered characters are labelled by their choices
    // Verified by labelling every character #0
    #[test]
    fn test_character_label() {
        let character = Character::from_pairs(&[("background", "Sky")]);
        assert_eq!(character_label(&character), "[background=Sky]");
    }

    // Tests token paths combine project name and identifier
    // Verified by dropping the project folder
    #[test]
    fn test_token_path() {
        let path = token_path(std::path::Path::new("tokens"), "Pals", 7);
        assert_eq!(path, std::path::Path::new("tokens/Pals/Pals_7.png"));
    }

    // Tests saved tokens are opaque RGB images
    // Verified by saving the RGBA composite
    #[test]
    fn test_save_token_flattened() {
        let temp = TempDir::new().unwrap();
        write_layer(temp.path(), "background", "Sky", [9, 9, 9, 255]);
        std::fs::create_dir_all(temp.path().join("out").join("demo")).unwrap();
        let character = Character::from_pairs(&[("background", "Sky")]);
        let image = render(&character, &["background"], temp.path()).unwrap();

        let path = save_token(&image, &temp.path().join("out"), "demo", 0).unwrap();

        let saved = image::open(&path).unwrap();
        assert_eq!(saved.color(), image::ColorType::Rgb8);
    }

    // Tests one failing token doesn't stop the rest
    // Verified by returning on the first render error
    #[test]
    fn test_render_collection_continues_after_failure() {
        let temp = TempDir::new().unwrap();
        let assets = temp.path().join("assets");
        let output = temp.path().join("out");
        let table = sample_table();
        write_sample_assets(&assets, &table);
        std::fs::remove_file(assets.join("face").join("RedApatheticSample.png")).unwrap();

        let mut collection = Collection::from_characters(vec![
            Character::from_pairs(&[
                ("background", "Purple Sample"),
                ("body", "Yellow Sample"),
                ("face", "Red Apathetic Sample"),
            ]),
            Character::from_pairs(&[
                ("background", "Purple Sample"),
                ("body", "Yellow Sample"),
                ("face", "Lavender Angry Sample"),
            ]),
        ]);
        collection.assign_ids().unwrap();
        let mut attempts = Vec::new();

        let summary = render_collection(
            &collection,
            &table.layer_order(),
            &assets,
            &output,
            "demo",
            |id, result| attempts.push((id, result.is_ok())),
        )
        .unwrap();

        assert_eq!(attempts, vec![(0, false), (1, true)]);
        assert_eq!(summary.total(), 2);
        assert_eq!(summary.rendered.len(), 1);
        assert_eq!(summary.failures.len(), 1);
        assert!(output.join("demo").join("demo_1.png").exists());
        assert!(!output.join("demo").join("demo_0.png").exists());
        assert!(matches!(
            summary.into_result(),
            Err(TokenatorError::RenderFailures {
                failed: 1,
                total: 2
            })
        ));
    }

    // Tests unnumbered characters abort rendering
    // Verified by defaulting missing identifiers to zero
    #[test]
    fn test_render_collection_requires_ids() {
        let temp = TempDir::new().unwrap();
        let collection = Collection::from_characters(vec![Character::from_pairs(&[(
            "background",
            "Sky",
        )])]);

        let result = render_collection(
            &collection,
            &["background"],
            temp.path(),
            temp.path(),
            "demo",
            |_, _| {},
        );
        assert!(matches!(
            result,
            Err(TokenatorError::InvalidParameter { .. })
        ));
    }

    // Tests an empty collection creates the project folder and renders nothing
    // Verified by skipping directory creation for empty collections
    #[test]
    fn test_render_empty_collection() {
        let temp = TempDir::new().unwrap();

        let summary = render_collection(
            &Collection::default(),
            &["background"],
            temp.path(),
            temp.path(),
            "empty",
            |_, _| {},
        )
        .unwrap();

        assert!(summary.is_success());
        assert_eq!(summary.total(), 0);
        assert!(temp.path().join("empty").is_dir());
    }
}
