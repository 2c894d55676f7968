//! CLAHE regression test
//!
//! Checks the per-stage properties of both variants (histogram totals,
//! clip residuals, monotone CDFs, corner/edge/interior blending) and the
//! agreement between the floating-point and fixed-point outputs.
//!
//! Run with:
//! ```
//! cargo test -p ispkit-clahe --test clahe_reg
//! ```

use ispkit_clahe::{
    AddressPlan, Backend, ClaheError, ClaheOptions, ClaheTables, FixedPoint, Neighborhood,
    Reference, TileGrid, build_histograms, clahe_fixed, clahe_reference, equalize_rgb,
    hardware_limit, reference_limit,
};
use ispkit_core::Plane;
use ispkit_io::ImageFormat;
use ispkit_test::{RegParams, golden_dir, synthetic};

/// Mapping of `level` through every tile in `tiles`, as (min, max).
fn mapping_range<F: Fn(usize) -> u64>(tiles: &[usize], map: F) -> (u64, u64) {
    let values: Vec<u64> = tiles.iter().map(|&t| map(t)).collect();
    let lo = values.iter().copied().min().unwrap_or(0);
    let hi = values.iter().copied().max().unwrap_or(0);
    (lo, hi)
}

#[test]
fn clahe_uniform_reg() {
    let mut rp = RegParams::new("clahe_uniform");

    let plane = synthetic::constant(16, 16, 100);
    let tables = ClaheTables::build(&plane, Reference::configure(16, 16, 8).unwrap()).unwrap();
    let out = tables.apply(&plane).unwrap();

    let mapping = (255.0 * tables.cdfs()[0].get(100)) as u8;
    let constant = out.data().iter().all(|&v| v == mapping);
    rp.compare_values(1.0, if constant { 1.0 } else { 0.0 }, 0.0);
    // 2x2 tiles: the limit is 0, so every count is stolen and none returned
    rp.compare_values(0.0, mapping as f64, 0.0);
    eprintln!("  uniform 16x16 -> {}", mapping);

    assert!(rp.cleanup(), "clahe_uniform regression test failed");
}

#[test]
fn clahe_histogram_reg() {
    let mut rp = RegParams::new("clahe_histogram");

    let plane = synthetic::dim(512, 512, 90, 24);
    let grid = TileGrid::new(512, 512, 8).unwrap();
    let hists = build_histograms(&plane, &grid).unwrap();
    rp.compare_values(64.0, hists.len() as f64, 0.0);

    for limit in [reference_limit(grid.tile_pixels()), hardware_limit(grid.tile_pixels())] {
        let mut worst = 0u32;
        for hist in &hists {
            rp.compare_values(grid.tile_pixels() as f64, hist.total() as f64, 0.0);
            let mut clipped = hist.clone();
            let stats = clipped.clip(limit);
            rp.compare_values(
                (grid.tile_pixels() - stats.residual as u64) as f64,
                clipped.total() as f64,
                0.0,
            );
            worst = worst.max(stats.residual);
        }
        rp.compare_values(1.0, if worst < 256 { 1.0 } else { 0.0 }, 0.0);
        eprintln!("  limit {}: largest residual {}", limit, worst);
    }

    assert!(rp.cleanup(), "clahe_histogram regression test failed");
}

#[test]
fn clahe_cdf_reg() {
    let mut rp = RegParams::new("clahe_cdf");

    let plane = synthetic::dim(512, 512, 40, 64);
    let reference =
        ClaheTables::build(&plane, Reference::configure(512, 512, 8).unwrap()).unwrap();
    for cdf in reference.cdfs() {
        rp.compare_values(1.0, if cdf.is_monotonic() { 1.0 } else { 0.0 }, 0.0);
        rp.compare_values(1.0, if cdf.last() <= 1.0 + 1e-9 { 1.0 } else { 0.0 }, 0.0);
    }

    let fixed = ClaheTables::build(&plane, FixedPoint::configure(512, 512, 8).unwrap()).unwrap();
    let params = *fixed.backend().params();
    for (cdf, stats) in fixed.cdfs().iter().zip(fixed.clip_stats()) {
        rp.compare_values(1.0, if cdf.is_monotonic() { 1.0 } else { 0.0 }, 0.0);
        let kept = params.total() - stats.residual as u64;
        rp.compare_values((kept / 128) as f64, cdf.last() as f64, 0.0);
    }

    assert!(rp.cleanup(), "clahe_cdf regression test failed");
}

/// Every output pixel against the mappings of its contributing tiles.
///
/// `raw` gives the unnarrowed output of pixel (x, y) holding `level`;
/// `corner_map` the unnarrowed mapping of `level` through one tile.
fn check_blending<B: Backend>(
    rp: &mut RegParams,
    plane: &Plane,
    tables: &ClaheTables<B>,
    raw: impl Fn(&Neighborhood, u8) -> u64,
    corner_map: impl Fn(usize, u8) -> u64,
) {
    let out = tables.apply(plane).unwrap();
    let plan = AddressPlan::new(tables.backend().grid());
    let (mut corner_bad, mut range_bad, mut narrow_bad) = (0u32, 0u32, 0u32);
    let (mut corners, mut edges, mut interior) = (0u32, 0u32, 0u32);

    for y in 0..plane.height() {
        for x in 0..plane.width() {
            let level = plane.get_unchecked(x, y);
            let n = plan.neighborhood(x, y);
            let v = raw(&n, level);
            if out.get_unchecked(x, y) != (v & 0xff) as u8 {
                narrow_bad += 1;
            }
            let (lo, hi) = mapping_range(&n.tiles(), |t| corner_map(t, level));
            match n {
                Neighborhood::Corner { .. } => {
                    corners += 1;
                    if v != lo {
                        corner_bad += 1;
                    }
                }
                Neighborhood::Edge { .. } => edges += 1,
                Neighborhood::Interior { .. } => interior += 1,
            }
            if v < lo || v > hi {
                range_bad += 1;
            }
        }
    }

    eprintln!(
        "  {} corner, {} edge, {} interior pixels",
        corners, edges, interior
    );
    rp.compare_values(0.0, narrow_bad as f64, 0.0);
    rp.compare_values(0.0, corner_bad as f64, 0.0);
    rp.compare_values(0.0, range_bad as f64, 0.0);
}

#[test]
fn clahe_blending_reg() {
    let mut rp = RegParams::new("clahe_blending");

    // Reference: 4x4 tiles of 32x32
    let plane = synthetic::texture(128, 128);
    let tables = ClaheTables::build(&plane, Reference::configure(128, 128, 4).unwrap()).unwrap();
    let cdfs = tables.cdfs();
    check_blending(
        &mut rp,
        &plane,
        &tables,
        |n, level| u64::from(tables.backend().map(cdfs, n, level)),
        |t, level| (255.0 * cdfs[t].get(level)) as u8 as u64,
    );

    // Fixed point: 8x8 tiles of 64x64, scale 2, so some outputs exceed 255
    // before narrowing
    let plane = synthetic::texture(512, 512);
    let tables = ClaheTables::build(&plane, FixedPoint::configure(512, 512, 8).unwrap()).unwrap();
    let params = *tables.backend().params();
    let cdfs = tables.cdfs();
    check_blending(
        &mut rp,
        &plane,
        &tables,
        |n, level| {
            let quad = n.quad();
            let c = quad.tiles.map(|t| cdfs[t].get(level));
            params.raw_level(params.weighted_average(c, quad.u, quad.v))
        },
        |t, level| params.raw_level(params.weighted_average([cdfs[t].get(level); 4], 0, 0)),
    );

    assert!(rp.cleanup(), "clahe_blending regression test failed");
}

#[test]
fn clahe_discontinuity_reg() {
    let mut rp = RegParams::new("clahe_discontinuity");

    // Bright left half, dark right half; row 24 holds level 128 throughout
    let mut pm = synthetic::split(64, 64).to_mut();
    pm.row_mut(24).fill(128);
    let plane: Plane = pm.into();

    // 4x4 tiles of 16x16: row 24 is the centre line of tile row 1, and
    // columns 24 and 40 are the centres of tiles 5 and 6
    let tables = ClaheTables::build(&plane, Reference::configure(64, 64, 4).unwrap()).unwrap();
    let out = tables.apply(&plane).unwrap();
    let row = out.row(24);

    let left = (255.0 * tables.cdfs()[5].get(128)) as u8;
    let right = (255.0 * tables.cdfs()[6].get(128)) as u8;
    eprintln!("  tile 5 -> {}, tile 6 -> {}: {:?}", left, right, &row[24..=40]);

    rp.compare_values(left as f64, row[24] as f64, 0.0);
    rp.compare_values(right as f64, row[40] as f64, 0.0);
    rp.compare_values(1.0, if u32::from(right) > u32::from(left) + 32 { 1.0 } else { 0.0 }, 0.0);

    let monotone = row[24..=40].windows(2).all(|w| w[0] < w[1]);
    rp.compare_values(1.0, if monotone { 1.0 } else { 0.0 }, 0.0);
    let largest_step = row[24..=40]
        .windows(2)
        .map(|w| w[1].saturating_sub(w[0]))
        .max()
        .unwrap_or(0);
    rp.compare_values(1.0, if largest_step < right.saturating_sub(left) / 4 { 1.0 } else { 0.0 }, 0.0);

    assert!(rp.cleanup(), "clahe_discontinuity regression test failed");
}

#[test]
fn clahe_parity_reg() {
    let mut rp = RegParams::new("clahe_parity");

    // 256x256 tiles that never clip, so both variants see the same histograms
    let plane = synthetic::diagonal_ramp(2048, 2048);

    let reference = ClaheTables::build(&plane, Reference::configure(2048, 2048, 8).unwrap()).unwrap();
    let fixed = ClaheTables::build(&plane, FixedPoint::configure(2048, 2048, 8).unwrap()).unwrap();
    let unclipped = reference
        .clip_stats()
        .iter()
        .chain(fixed.clip_stats())
        .all(|s| s.steal == 0);
    rp.compare_values(1.0, if unclipped { 1.0 } else { 0.0 }, 0.0);

    // Same case selection
    rp.compare_values(
        1.0,
        if reference.backend().grid() == fixed.backend().grid() { 1.0 } else { 0.0 },
        0.0,
    );

    let soft = reference.apply(&plane).unwrap();
    let hard = fixed.apply(&plane).unwrap();
    let report = soft.parity(&hard).unwrap();
    let bound = fixed.backend().params().divergence_bound();
    eprintln!(
        "  max {} mean {:.4} mismatches {} (bound {})",
        report.max_error, report.mean_error, report.mismatches, bound
    );
    rp.compare_values(1.0, bound as f64, 0.0);
    rp.compare_planes_within(&soft, &hard, bound as u8);

    // The entry points agree with the tables
    rp.compare_planes(&soft, &clahe_reference(&plane, 8).unwrap());
    rp.compare_planes(&hard, &clahe_fixed(&plane).unwrap());

    assert!(rp.cleanup(), "clahe_parity regression test failed");
}

// Golden outputs below were produced by the Python CLAHE models on
// `synthetic::diagonal_ramp(640, 480)`.

#[test]
fn clahe_model_fixed_reg() {
    let mut rp = RegParams::new("clahe_model_fixed");

    // 80x60 tiles: total 4800, limit 75, scale 2
    let plane = synthetic::diagonal_ramp(640, 480);
    let tables = ClaheTables::build(&plane, FixedPoint::configure(640, 480, 8).unwrap()).unwrap();
    let params = *tables.backend().params();
    rp.compare_values(75.0, params.limit() as f64, 0.0);
    rp.compare_values(2.0, params.scale() as f64, 0.0);

    let out = tables.apply(&plane).unwrap();
    rp.write_plane_and_check(&out, ImageFormat::Png)
        .expect("write fixed-point output");

    let golden = ispkit_io::read_plane(format!("{}/clahe_model_fixed_golden.01.png", golden_dir()))
        .expect("read fixed-point golden");
    rp.compare_planes(&golden, &out);

    // Outputs past 255 keep their low 8 bits
    let plan = AddressPlan::new(tables.backend().grid());
    let cdfs = tables.cdfs();
    let mut overflowed = 0u32;
    let mut wrapped_bad = 0u32;
    for y in 0..480 {
        for x in 0..640 {
            let level = plane.get_unchecked(x, y);
            let quad = plan.neighborhood(x, y).quad();
            let acc = params.weighted_average(quad.tiles.map(|t| cdfs[t].get(level)), quad.u, quad.v);
            if params.overflows(acc) {
                overflowed += 1;
                if u64::from(out.get_unchecked(x, y)) != params.raw_level(acc) - 256 {
                    wrapped_bad += 1;
                }
            }
        }
    }
    eprintln!("  {} outputs wrapped past 255", overflowed);
    rp.compare_values(13_190.0, overflowed as f64, 0.0);
    rp.compare_values(0.0, wrapped_bad as f64, 0.0);

    assert!(rp.cleanup(), "clahe_model_fixed regression test failed");
}

#[test]
fn clahe_model_reference_reg() {
    let mut rp = RegParams::new("clahe_model_reference");

    let plane = synthetic::diagonal_ramp(640, 480);
    let out = clahe_reference(&plane, 8).unwrap();
    rp.write_plane_and_check(&out, ImageFormat::Png)
        .expect("write reference output");

    let golden =
        ispkit_io::read_plane(format!("{}/clahe_model_reference_golden.01.png", golden_dir()))
            .expect("read reference golden");
    rp.compare_planes(&golden, &out);

    assert!(rp.cleanup(), "clahe_model_reference regression test failed");
}

#[test]
fn clahe_config_reg() {
    let mut rp = RegParams::new("clahe_config");

    let small = synthetic::texture(40, 40);
    let checks = [
        // 5-pixel tiles are odd
        matches!(clahe_reference(&small, 8), Err(ClaheError::Indivisible { divisor: 16, .. })),
        matches!(clahe_reference(&small, 0), Err(ClaheError::ZeroBlock)),
        // 25-pixel tiles give a zero output scale
        matches!(clahe_fixed(&small), Err(ClaheError::DegenerateScale { total: 25 })),
        matches!(
            FixedPoint::configure(1024, 1024, 16),
            Err(ClaheError::UnsupportedBlock { expected: 8, actual: 16 })
        ),
        matches!(clahe_fixed(&synthetic::texture(1004, 1000)), Err(ClaheError::Indivisible { .. })),
    ];
    for ok in checks {
        rp.compare_values(1.0, if ok { 1.0 } else { 0.0 }, 0.0);
    }

    assert!(rp.cleanup(), "clahe_config regression test failed");
}

#[test]
fn clahe_color_reg() {
    let mut rp = RegParams::new("clahe_color");

    let image = synthetic::color_texture(256, 256);
    let options = ClaheOptions::default();
    let out = equalize_rgb::<Reference>(&image, &options).unwrap();
    let value = ispkit_clahe::equalize::<Reference>(&image.value_plane(), &options).unwrap();

    rp.compare_values(1.0, if out.dimensions() == (256, 256) { 1.0 } else { 0.0 }, 0.0);

    // Non-black pixels carry the equalized value in their largest channel
    let before = image.value_plane();
    let mut wrong = 0u32;
    for y in 0..256 {
        for x in 0..256 {
            let (r, g, b) = out.get(x, y).unwrap();
            if before.get_unchecked(x, y) > 0 && r.max(g).max(b) != value.get_unchecked(x, y) {
                wrong += 1;
            }
        }
    }
    rp.compare_values(0.0, wrong as f64, 0.0);

    assert!(rp.cleanup(), "clahe_color regression test failed");
}
