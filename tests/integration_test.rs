use ru_ga_x::{
    errors::{Result, RuGaXError},
    export,
    prelude::*,
    testing::SyntheticGrads,
};

/// Value the synthetic session stores at a grid position
fn expected(x: usize, y: usize, z: usize, t: usize, e: usize) -> f32 {
    (x + 10 * y + 100 * z + 1000 * t + 10000 * e) as f32
}

fn ranges(grads: &SyntheticGrads) -> Vec<(f64, f64)> {
    [Axis::X, Axis::Y, Axis::Z, Axis::T, Axis::E]
        .iter()
        .map(|&axis| grads.range(axis))
        .collect()
}

#[test]
fn test_two_varying_axes_single_read() -> Result<()> {
    let mut grads = SyntheticGrads::new([6, 4, 3, 2, 1]);

    let arr = export(&mut grads, "tmp", false)?;

    // x and y vary by default: one read, no sweep statements
    assert_eq!(grads.reads(), 1);
    assert!(!grads
        .statements()
        .iter()
        .any(|s| s.starts_with("set z") && s != "set z 1"));
    assert_eq!(arr.ndim(), 2);
    assert_eq!(arr.shape(), &[4, 6]);
    assert_eq!(arr.dims(), &["lat", "lon"]);
    assert_eq!(arr.data()[[2, 5]], expected(6, 3, 1, 1, 1));

    let lon = arr.coord("lon").unwrap().as_values().unwrap();
    assert_eq!(lon, &[0.0, 2.5, 5.0, 7.5, 10.0, 12.5]);
    let lat = arr.coord("lat").unwrap().as_values().unwrap();
    assert_eq!(lat, &[-90.0, -87.5, -85.0, -82.5]);

    Ok(())
}

#[test]
fn test_four_dimensional_sweep_fills_every_cell() -> Result<()> {
    let mut grads = SyntheticGrads::new([4, 3, 2, 5, 1]);
    grads.relay("set z 1 2\nset t 1 5")?;
    grads.clear_log();

    let arr = export(&mut grads, "tmp", false)?;

    // one 2-D read per (z, t) combination
    assert_eq!(grads.reads(), 2 * 5);
    assert_eq!(arr.dims(), &["lat", "lon", "lev", "time"]);
    assert_eq!(arr.shape(), &[3, 4, 2, 5]);
    assert_eq!(arr.data().len(), 3 * 4 * 2 * 5);
    assert!(arr.data().iter().all(|&v| v != 0.0));

    for y in 0..3 {
        for x in 0..4 {
            for z in 0..2 {
                for t in 0..5 {
                    assert_eq!(
                        arr.data()[[y, x, z, t]],
                        expected(x + 1, y + 1, z + 1, t + 1, 1)
                    );
                }
            }
        }
    }

    let lev = arr.coord("lev").unwrap().as_values().unwrap();
    assert_eq!(lev, &[1000.0, 900.0]);

    Ok(())
}

#[test]
fn test_sweep_over_partial_index_range() -> Result<()> {
    let mut grads = SyntheticGrads::new([3, 2, 6, 1, 1]);
    grads.relay("set z 3 5")?;

    let arr = export(&mut grads, "tmp", false)?;

    assert_eq!(arr.shape(), &[2, 3, 3]);
    // position 0 along lev holds grid index 3
    assert_eq!(arr.data()[[0, 0, 0]], expected(1, 1, 3, 1, 1));
    assert_eq!(arr.data()[[1, 2, 2]], expected(3, 2, 5, 1, 1));
    assert_eq!(
        arr.coord("lev").unwrap().as_values().unwrap(),
        &[800.0, 700.0, 600.0]
    );

    Ok(())
}

#[test]
fn test_dimension_state_restored_after_export() -> Result<()> {
    let mut grads = SyntheticGrads::new([5, 4, 3, 6, 2]);
    grads.relay("set x 2 5\nset y 1 3\nset z 2\nset t 2 4\nset e 1 2")?;
    let before = ranges(&grads);

    export(&mut grads, "tmp", false)?;

    assert_eq!(ranges(&grads), before);
    // the fixed level was pinned to 1 while resolving coordinates
    assert_eq!(grads.range(Axis::Z), (2.0, 2.0));

    Ok(())
}

#[test]
fn test_dimension_state_restored_after_failure() -> Result<()> {
    let mut grads = SyntheticGrads::new([3, 3, 1, 4, 1]).fail_on("set t 3");
    grads.relay("set t 1 4")?;
    let before = ranges(&grads);

    let result = export(&mut grads, "tmp", false);

    match result {
        Err(RuGaXError::CommandFailed { command, status, .. }) => {
            assert_eq!(command, "set t 3");
            assert_eq!(status, 1);
        }
        other => panic!("Expected CommandFailed, got {:?}", other.map(|a| a.shape().to_vec())),
    }
    assert_eq!(ranges(&grads), before);

    Ok(())
}

#[test]
fn test_xyz_layout() -> Result<()> {
    let mut grads = SyntheticGrads::new([4, 3, 2, 1, 1]);
    grads.relay("set z 1 2")?;

    // {x, y} is the first matching preference, z follows
    let arr = export(&mut grads, "tmp", false)?;
    assert_eq!(arr.dims(), &["lat", "lon", "lev"]);
    assert_eq!(arr.shape(), &[3, 4, 2]);

    // a caller-supplied layout yields (lev, lat, lon)
    let config = ExportConfig::new().with_layout(AxisLayout::Explicit(vec![Axis::Z, Axis::Y, Axis::X]));
    let mut exporter = Exporter::with_config(&mut grads, config);
    let arr = exporter.export("tmp", false)?;
    assert_eq!(arr.dims(), &["lev", "lat", "lon"]);
    assert_eq!(arr.shape(), &[2, 3, 4]);
    assert_eq!(arr.data()[[1, 2, 3]], expected(4, 3, 2, 1, 1));

    Ok(())
}

#[test]
fn test_time_only_export() -> Result<()> {
    let mut grads = SyntheticGrads::new([4, 3, 1, 8, 1]);
    grads.relay("set x 1\nset y 1\nset t 1 5")?;
    grads.clear_log();

    let arr = export(&mut grads, "tmp", false)?;

    assert_eq!(arr.ndim(), 1);
    assert_eq!(arr.shape(), &[5]);
    assert_eq!(arr.dims(), &["time"]);

    let times = arr.coord("time").unwrap().as_times().unwrap();
    assert_eq!(times.len(), 5);
    for (i, label) in times.iter().enumerate() {
        assert_eq!(label.display, grads.time_label(i as i64 + 1));
        assert!(label.datetime.is_some());
    }
    assert_eq!(times[1].display, "06Z01JAN2000");

    // one snapshot plus one query per time index
    assert_eq!(grads.env_queries(), 1 + 5);
    assert_eq!(grads.evaluations(), 0);

    Ok(())
}

#[test]
fn test_permutation_of_swept_axes() -> Result<()> {
    // x, t, e vary: read (x, t), sweep e
    let mut grads = SyntheticGrads::new([3, 1, 1, 4, 2]);
    grads.relay("set y 1\nset t 1 4\nset e 1 2")?;

    let arr = export(&mut grads, "tmp", false)?;
    assert_eq!(arr.dims(), &["time", "lon", "ens"]);
    assert_eq!(arr.shape(), &[4, 3, 2]);
    assert_eq!(arr.data()[[3, 1, 1]], expected(2, 1, 1, 4, 2));

    // a three-cycle relative to the read order (x, t, e)
    let config = ExportConfig::new().with_layout(AxisLayout::Explicit(vec![Axis::E, Axis::X, Axis::T]));
    let arr = Exporter::with_config(&mut grads, config).export("tmp", false)?;
    assert_eq!(arr.dims(), &["ens", "lon", "time"]);
    assert_eq!(arr.shape(), &[2, 3, 4]);
    for e in 0..2 {
        for x in 0..3 {
            for t in 0..4 {
                assert_eq!(arr.data()[[e, x, t]], expected(x + 1, 1, 1, t + 1, e + 1));
            }
        }
    }
    assert_eq!(arr.coord("ens").unwrap().as_values().unwrap(), &[1.0, 2.0]);

    Ok(())
}

#[test]
fn test_all_axes_fixed_gives_scalar() -> Result<()> {
    let mut grads = SyntheticGrads::new([3, 3, 1, 1, 1]);
    grads.relay("set x 2\nset y 3")?;

    let arr = export(&mut grads, "tmp", false)?;
    assert_eq!(arr.ndim(), 0);
    assert_eq!(arr.data().iter().copied().collect::<Vec<_>>(), vec![expected(2, 3, 1, 1, 1)]);

    Ok(())
}

#[test]
fn test_chunked_export() -> Result<()> {
    let mut grads = SyntheticGrads::new([4, 6, 1, 1, 1]);

    let arr = export(&mut grads, "tmp", true)?;
    assert!(arr.is_chunked());
    assert_eq!(arr.chunk_len(), Some(6));
    assert_eq!(arr.chunks().count(), 1);

    let config = ExportConfig::new().with_chunk_len(4);
    let arr = Exporter::with_config(&mut grads, config).export("tmp", true)?;
    let lens: Vec<usize> = arr.chunks().map(|c| c.shape()[0]).collect();
    assert_eq!(lens, vec![4, 2]);

    let arr = export(&mut grads, "tmp", false)?;
    assert!(!arr.is_chunked());

    Ok(())
}

#[test]
fn test_attributes_and_labels() -> Result<()> {
    let mut grads = SyntheticGrads::new([2, 2, 1, 1, 1]);
    let names = AxisNames {
        x: "longitude".to_string(),
        y: "latitude".to_string(),
        ..AxisNames::default()
    };
    let config = ExportConfig::new().with_names(names);
    let mut exporter = Exporter::with_config(&mut grads, config);

    let arr = exporter.export("tmp*2", false)?;
    assert_eq!(arr.name, "tmp*2");
    assert_eq!(arr.dims(), &["latitude", "longitude"]);
    assert_eq!(arr.attributes["expression"], "tmp*2");
    assert!(arr.attributes["history"]
        .as_str()
        .unwrap()
        .starts_with("Exported by RuGaX"));

    let quiet = Exporter::with_config(&mut grads, ExportConfig::new().without_history())
        .export("tmp", false)?;
    assert!(!quiet.attributes.contains_key("history"));

    Ok(())
}

#[test]
fn test_custom_field_values() -> Result<()> {
    let mut grads = SyntheticGrads::new([2, 2, 3, 1, 1]).with_field(|[x, y, z, _, _]| (x * y * z) as f32);
    grads.relay("set z 1 3")?;

    let arr = export(&mut grads, "tmp", false)?;
    let total: f32 = arr.data().sum();
    // (1 + 2) * (1 + 2) * (1 + 2 + 3)
    assert_eq!(total, 54.0);

    Ok(())
}
