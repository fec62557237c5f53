use std::{fs, process::Command};

const BIN: &str = env!("CARGO_BIN_EXE_map-bench-graphs");

#[test]
fn missing_data_dir_fails_without_output() {
  let dir = tempfile::tempdir().unwrap();

  let output = Command::new(BIN).current_dir(dir.path()).arg("graphs").output().unwrap();

  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("run the C++ benchmark first"), "{stderr}");
  assert!(!dir.path().join("graphs").exists());
  assert!(output.stdout.is_empty());
}

#[test]
fn table_prints_averages() {
  let dir = tempfile::tempdir().unwrap();
  let data_dir = dir.path().join("data");
  fs::create_dir(&data_dir).unwrap();
  fs::write(
    data_dir.join("cache_bench.csv"),
    "users,op,map,time\n1,put,sc,100\n2,put,sc,200\n8,put,sc,0\n1,put,lp,150\n2,put,lp,250\n8,put,lp,0\n",
  )
  .unwrap();

  let output = Command::new(BIN)
    .current_dir(dir.path())
    .args(["table", "--maps", "sc,lp", "--subsets", "put,remove"])
    .output()
    .unwrap();

  assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("cache bench / put"), "{stdout}");
  assert!(stdout.contains("         1       1.000       1.500"), "{stdout}");
  assert!(stdout.contains("         2       2.000       2.500"), "{stdout}");
  assert!(!stdout.contains("         8"), "{stdout}");
  assert!(!stdout.contains("remove"), "{stdout}");
  assert!(!dir.path().join("graphs").exists());
}

#[test]
fn malformed_csv_fails() {
  let dir = tempfile::tempdir().unwrap();
  let data_dir = dir.path().join("data");
  fs::create_dir(&data_dir).unwrap();
  fs::write(data_dir.join("broken.csv"), "users,op,map\n1,put,sc\n").unwrap();

  let output = Command::new(BIN).current_dir(dir.path()).arg("table").output().unwrap();

  assert!(!output.status.success());
  assert!(String::from_utf8_lossy(&output.stderr).contains("broken"));
}

#[test]
fn graphs_writes_images_and_progress() {
  let dir = tempfile::tempdir().unwrap();
  let data_dir = dir.path().join("data");
  fs::create_dir(&data_dir).unwrap();
  fs::write(
    data_dir.join("cache_bench.csv"),
    "users,op,map,time\n\
     1,put,sc,100\n2,put,sc,200\n8,put,sc,0\n1,put,lp,150\n2,put,lp,250\n8,put,lp,0\n\
     1,remove,sc,10\n2,remove,sc,20\n1,remove,lp,30\n2,remove,lp,40\n",
  )
  .unwrap();

  let output = Command::new(BIN)
    .current_dir(dir.path())
    .args(["graphs", "--maps", "sc,lp", "--dpi", "50"])
    .output()
    .unwrap();

  assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
  assert_eq!(
    String::from_utf8_lossy(&output.stdout),
    "saved cache_bench put graphs\nsaved cache_bench remove graphs\n"
  );

  let mut names: Vec<_> = fs::read_dir(dir.path().join("graphs"))
    .unwrap()
    .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
    .collect();
  names.sort();
  assert_eq!(
    names,
    ["cache_bench_put.png", "cache_bench_put_bar.png", "cache_bench_remove.png", "cache_bench_remove_bar.png"]
  );
}

#[test]
fn rejects_non_positive_divisor_and_dpi() {
  let dir = tempfile::tempdir().unwrap();
  fs::create_dir(dir.path().join("data")).unwrap();

  for args in [&["table", "--divisor", "0"][..], &["table", "--divisor", "-5"][..], &["graphs", "--dpi", "0"][..]] {
    let output = Command::new(BIN).current_dir(dir.path()).args(args).output().unwrap();

    assert!(!output.status.success(), "{args:?}");
  }
  assert!(!dir.path().join("graphs").exists());
}

#[test]
fn rejects_duplicate_maps() {
  let dir = tempfile::tempdir().unwrap();
  fs::create_dir(dir.path().join("data")).unwrap();

  let output = Command::new(BIN).current_dir(dir.path()).args(["table", "--maps", "sc,sc"]).output().unwrap();

  assert!(!output.status.success());
  assert!(String::from_utf8_lossy(&output.stderr).contains("listed more than once"));
}
