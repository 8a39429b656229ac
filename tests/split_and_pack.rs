use clap::Parser;
use image::GrayImage;
use image::Luma;
use image::Rgb;
use image::RgbImage;
use imgtools::Error;
use imgtools::cli::Cli;
use std::path::Path;
use tempfile::tempdir;

fn run(args: &[&str]) -> eyre::Result<()> {
    let mut full = vec!["imgtools"];
    full.extend_from_slice(args);
    Cli::try_parse_from(full)?.invoke()
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn split_command_writes_every_piece() -> eyre::Result<()> {
    let td = tempdir()?;
    let source = td.path().join("castle.png");
    RgbImage::from_fn(101, 40, |x, y| Rgb([x as u8, y as u8, 0])).save(&source)?;
    let out = td.path().join("pieces");

    run(&["split", arg(&source), "--rows", "2", "--cols", "3", "-o", arg(&out)])?;

    let mut names: Vec<String> = std::fs::read_dir(&out)?
        .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<_, _>>()?;
    names.sort();
    assert_eq!(
        names,
        vec![
            "castle_piece_1_1.png",
            "castle_piece_1_2.png",
            "castle_piece_1_3.png",
            "castle_piece_2_1.png",
            "castle_piece_2_2.png",
            "castle_piece_2_3.png",
        ]
    );

    // Widths follow floor boundaries 0, 33, 67, 101
    let last = image::open(out.join("castle_piece_2_3.png"))?.to_rgb8();
    assert_eq!(last.dimensions(), (34, 20));
    assert_eq!(last.get_pixel(0, 0), &Rgb([67, 20, 0]));
    Ok(())
}

#[test]
fn dry_run_writes_nothing() -> eyre::Result<()> {
    let td = tempdir()?;
    let source = td.path().join("a.png");
    GrayImage::new(8, 8).save(&source)?;
    let out = td.path().join("never");

    run(&["split", arg(&source), "-o", arg(&out), "--dry-run"])?;
    assert!(!out.exists());
    Ok(())
}

#[test]
fn zero_rows_fail_before_the_output_dir_is_created() -> eyre::Result<()> {
    let td = tempdir()?;
    let source = td.path().join("a.png");
    GrayImage::new(8, 8).save(&source)?;
    let out = td.path().join("out");

    let err = run(&["split", arg(&source), "--rows", "0", "-o", arg(&out)]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::InvalidGrid { rows: 0, cols: 2 })
    ));
    assert!(!out.exists());
    Ok(())
}

#[test]
fn unsupported_source_is_reported() -> eyre::Result<()> {
    let td = tempdir()?;
    let source = td.path().join("notes.txt");
    std::fs::write(&source, "hello")?;

    let err = run(&["split", arg(&source), "-o", arg(td.path())]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::UnsupportedFormat { .. })
    ));
    Ok(())
}

#[test]
fn preview_command_writes_annotated_copy() -> eyre::Result<()> {
    let td = tempdir()?;
    let source = td.path().join("a.png");
    RgbImage::from_pixel(40, 40, Rgb([0, 0, 255])).save(&source)?;
    let output = td.path().join("grid");

    run(&["preview", arg(&source), "--rows", "2", "--cols", "2", "-o", arg(&output)])?;

    let annotated = image::open(td.path().join("grid.png"))?.to_rgba8();
    assert_eq!(annotated.dimensions(), (40, 40));
    assert_eq!(annotated.get_pixel(20, 5).0, [255, 0, 0, 255]);
    assert_eq!(annotated.get_pixel(5, 5).0, [0, 0, 255, 255]);
    Ok(())
}

#[test]
fn pack_command_combines_mixed_sizes() -> eyre::Result<()> {
    let td = tempdir()?;
    let red = td.path().join("r.png");
    let blue = td.path().join("b.bmp");
    GrayImage::from_pixel(10, 10, Luma([200])).save(&red)?;
    GrayImage::from_pixel(20, 5, Luma([50])).save(&blue)?;
    let output = td.path().join("packed");

    run(&["pack", "--red", arg(&red), "--blue", arg(&blue), "-o", arg(&output)])?;

    let packed = image::open(td.path().join("packed.png"))?.to_rgb8();
    assert_eq!(packed.dimensions(), (20, 10));
    assert!(packed.pixels().all(|p| p.0 == [200, 0, 50]));
    Ok(())
}

#[test]
fn pack_without_channels_fails_and_writes_nothing() -> eyre::Result<()> {
    let td = tempdir()?;
    let output = td.path().join("packed.png");

    let err = run(&["pack", "-o", arg(&output)]).unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NoChannels)));
    assert!(!output.exists());
    assert_eq!(std::fs::read_dir(td.path())?.count(), 0);
    Ok(())
}

#[test]
fn preview_command_rejects_grid_finer_than_image() -> eyre::Result<()> {
    let td = tempdir()?;
    let source = td.path().join("a.png");
    GrayImage::new(4, 4).save(&source)?;
    let output = td.path().join("grid.png");

    let err = run(&["preview", arg(&source), "--cols", "4294967295", "-o", arg(&output)])
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::GridExceedsImage { width: 4, .. })
    ));
    assert!(!output.exists());
    Ok(())
}
