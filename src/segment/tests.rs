use super::*;

const LAMMPS_LOG: &str = r#"LAMMPS (29 Oct 2020)
  using 1 OpenMP thread(s) per MPI task
Reading data file ...
  orthogonal box = (0.0 0.0 0.0) to (16.8 16.8 16.8)
Setting up Verlet run ...
  Unit style    : lj
Per MPI rank memory allocation (min/avg/max) = 2.706 | 2.706 | 2.706 Mbytes
Step Temp E_pair E_mol TotEng Press
       0         1.44   -6.7733681            0   -4.6218056   -5.0244179
      50    0.7036088   -5.6763881            0   -4.6248051    0.7049373
     100   0.72294874   -5.7126312            0   -4.6327174   0.61522206
Loop time of 0.0419 on 1 procs for 100 steps with 4000 atoms

WARNING: Neighbor list overflow (src/neighbor.cpp:1234)
Step Temp E_pair E_mol TotEng Press
     100   0.72294874   -5.7126312            0   -4.6327174   0.61522206
     150   0.73092453   -5.7205423            0   -4.6292648   0.62118431
Loop time of 0.0211 on 1 procs for 50 steps with 4000 atoms
Total wall time: 0:00:00
"#;

fn spec(names: &[&str]) -> ColumnSpec {
    ColumnSpec::new(names.iter().copied()).unwrap()
}

fn scan(text: &str, names: &[&str]) -> SegmentSet {
    scan_str(text, &spec(names), HeaderPolicy::Discard).unwrap()
}

#[test]
fn test_lammps_log() {
    let set = scan(LAMMPS_LOG, &["Step", "TotEng", "Temp"]);
    assert_eq!(set.len(), 2);

    let first = &set.segments()[0];
    assert_eq!(first.header_line(), 8);
    assert_eq!(first.first_line(), 9);
    assert_eq!(first.last_line(), 11);
    assert_eq!(first.width(), 6);
    assert_eq!(first.rows()[0], vec![0.0, -4.6218056, 1.44]);

    let last = &set.segments()[1];
    assert_eq!(last.row_count(), 2);
    assert_eq!(last.rows()[1], vec![150.0, -4.6292648, 0.73092453]);
}

#[test]
fn test_two_blocks_select_first_last_out_of_range() {
    let text = "\
Step PotEng TotEng
0 1.0 2.0
1 1.1 2.2

Step PotEng TotEng
0 3.0 4.0
1 3.1 4.1
2 3.2 4.2
";
    let set = scan(text, &["Step", "PotEng", "TotEng"]);
    assert_eq!(set.len(), 2);

    let first = set.select_table(&InstanceSelector::First).unwrap();
    assert_eq!(first.row_count(), 2);
    assert_eq!(first.column("PotEng").unwrap(), &[1.0, 1.1]);

    let last = set.select_table(&InstanceSelector::Last).unwrap();
    assert_eq!(last.row_count(), 3);
    assert_eq!(last.independent_axis(), "Step");

    let selector: InstanceSelector = "3".parse().unwrap();
    assert!(matches!(
        set.select(&selector),
        Err(SegmentError::SelectorOutOfRange { index: 2, available: 2 })
    ));
}

#[test]
fn test_back_to_back_headers_never_emit_empty_segment() {
    let text = "\
x y
x y
1 2
";
    let set = scan(text, &["x", "y"]);
    assert_eq!(set.len(), 1);
    assert_eq!(set.segments()[0].header_line(), 2);
    assert!(set.iter().all(|s| s.row_count() > 0));

    let flushed = scan_str(text, &spec(&["x", "y"]), HeaderPolicy::Flush).unwrap();
    assert_eq!(flushed.len(), 1);
}

#[test]
fn test_short_row_closes_segment() {
    let text = "\
a b c
1 2 3
4 5
7 8 9
";
    let set = scan(text, &["a", "c"]);
    assert_eq!(set.len(), 1);
    assert_eq!(set.segments()[0].rows(), &[vec![1.0, 3.0]]);
}

#[test]
fn test_non_numeric_token_closes_segment() {
    let text = "\
a b
1 2
3 NaN?
4 5
";
    let set = scan(text, &["a", "b"]);
    assert_eq!(set.len(), 1);
    assert_eq!(set.segments()[0].row_count(), 1);
}

#[test]
fn test_no_headers_is_empty_not_error() {
    let set = scan("just some prose\n1 2 3\n", &["Step"]);
    assert!(set.is_empty());
    assert!(matches!(
        set.select(&InstanceSelector::First),
        Err(SegmentError::NoSegmentsFound)
    ));
}

#[test]
fn test_segment_at_end_of_file_without_newline() {
    let set = scan("t v\n0 1\n1 2", &["t", "v"]);
    assert_eq!(set.len(), 1);
    assert_eq!(set.segments()[0].row_count(), 2);
}

#[test]
fn test_invalid_utf8_line_is_a_boundary() {
    let mut bytes = b"t v\n0 1\n".to_vec();
    bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
    bytes.extend_from_slice(b"1 2\n");

    let set = scan_reader(&bytes[..], &spec(&["t", "v"]), HeaderPolicy::Discard).unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(set.segments()[0].row_count(), 1);
}

#[test]
fn test_header_with_units_is_recognized() {
    let text = "\
# time(ps) energy(kJ/mol)
time energy units: ps kJ/mol
0.0 -100.0 0 0 0
";
    // Header width is 5, so data rows need five tokens
    let set = scan(text, &["time", "energy"]);
    assert_eq!(set.len(), 1);
    assert_eq!(set.segments()[0].rows(), &[vec![0.0, -100.0]]);
}

#[test]
fn test_row_length_follows_requested_columns_not_header_width() {
    let set = scan("Step Temp Press Volume\n1 2 3 4\n", &["Step", "Temp", "Press"]);
    let segment = &set.segments()[0];
    assert_eq!(segment.width(), 4);
    assert_eq!(segment.rows(), &[vec![1.0, 2.0, 3.0]]);
    assert!(segment.rows().iter().all(|row| row.len() == set.columns().len()));
}

#[test]
fn test_scan_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.lammps");
    std::fs::write(&path, LAMMPS_LOG).unwrap();

    let set = scan_file(&path, &spec(&["Step", "Press"]), HeaderPolicy::Discard).unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.columns().names(), &["Step".to_string(), "Press".to_string()]);
}

#[test]
fn test_scan_missing_file() {
    let result = scan_file("/nonexistent/log.lammps", &spec(&["Step"]), HeaderPolicy::Discard);
    assert!(matches!(result, Err(SegmentError::IoError(_))));
}
