use covidfilter::{filter_table, table, FilterError, Params, TableError};

use std::{fs, path::Path, process::Command};

use tempfile::TempDir;

const LINEAGES: &str = "\
pango_lineage\tcode\tcountry\tdivision\t2021-01-03\t2021-01-10
B.1.1.7\tBR\tBrazil\tSP\t4\t9
P.1\tBR\tBrazil\tUnknown\t12\t30
P.1\t\tBrazil\t\t1\t0
C.37\tPE\tPeru\tLima\t7\t5
B.1.1.7\tCW\tCuracao\t\t1
";

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn load_filter_and_write() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "matrix.tsv", LINEAGES);
    let output = dir.path().join("out.tsv");

    let t = table::load(&input).unwrap();
    assert_eq!(t.len(), 5);
    assert_eq!(t.columns()[4], "2021-01-03");
    // Short trailing row is padded
    assert_eq!(t.get(4, "2021-01-10"), Some(""));

    let out = filter_table(&t, Some("country:Brazil, ~division:Unknown, ~division:''")).unwrap();
    table::write_tsv(&out, &output).unwrap();

    assert_eq!(
        lines(&output),
        vec![
            "pango_lineage\tcode\tcountry\tdivision\t2021-01-03\t2021-01-10",
            "B.1.1.7\tBR\tBrazil\tSP\t4\t9",
        ]
    );
}

#[test]
fn csv_input_is_detected() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "cases.csv",
        "state,epiweek,cases\nSP,2021-01,10\nRJ,2021-01,3\nSP,2021-02,8\n",
    );
    let t = table::load(&input).unwrap();
    let out = filter_table(&t, Some("~state:RJ")).unwrap();
    let weeks: Vec<&str> = out.rows().filter_map(|r| r.get("epiweek")).collect();
    assert_eq!(weeks, vec!["2021-01", "2021-02"]);
}

#[test]
fn unsupported_and_missing_files() {
    let dir = TempDir::new().unwrap();
    let xlsx = write(&dir, "metadata.xlsx", "not really a workbook");
    assert!(matches!(
        table::load(&xlsx),
        Err(TableError::UnsupportedFormat { .. })
    ));
    assert!(matches!(
        table::load(dir.path().join("absent.tsv")),
        Err(TableError::Io { .. })
    ));
}

#[test]
fn unknown_column_in_loaded_table() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "matrix.tsv", LINEAGES);
    let t = table::load(&input).unwrap();
    let err = filter_table(&t, Some("region:Sudeste")).unwrap_err();
    assert_eq!(
        err,
        FilterError::ColumnNotFound {
            column: "region".into()
        }
    );
}

#[test]
fn parameter_table() {
    let dir = TempDir::new().unwrap();
    let cfg = write(
        &dir,
        "params.tsv",
        "param\tvalue\nbackend\tpdf\nfilter\t~country:Curacao, ~country:Crimea\nlegend\n",
    );
    let params = Params::load(&cfg).unwrap();
    assert_eq!(params.get("backend"), Some("pdf"));
    assert_eq!(params.get("legend"), Some(""));
    assert_eq!(params.filter(), Some("~country:Curacao, ~country:Crimea"));

    let bad = write(&dir, "bad.tsv", "key\tvalue\nfilter\tx:y\n");
    assert!(matches!(
        Params::load(&bad),
        Err(TableError::MissingParamColumn("param"))
    ));
}

#[test]
fn command_line_pipeline() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "matrix.tsv", LINEAGES);
    let cfg = write(&dir, "params.tsv", "param\tvalue\nfilter\t~country:Curacao\n");
    let output = dir.path().join("out.tsv");

    let status = Command::new(env!("CARGO_BIN_EXE_covidfilter"))
        .arg("--input")
        .arg(&input)
        .arg("--config")
        .arg(&cfg)
        .args(["--index", "code"])
        .args(["--sortby", "country", "pango_lineage"])
        .arg("--output")
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let out = lines(&output);
    assert_eq!(out.len(), 4);
    assert_eq!(out[1], "B.1.1.7\tBR\tBrazil\tSP\t4\t9");
    assert_eq!(out[2], "P.1\tBR\tBrazil\tUnknown\t12\t30");
    assert_eq!(out[3], "C.37\tPE\tPeru\tLima\t7\t5");
}

#[test]
fn command_line_rejects_malformed_filter() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "matrix.tsv", LINEAGES);
    let output = dir.path().join("out.tsv");

    let result = Command::new(env!("CARGO_BIN_EXE_covidfilter"))
        .arg("--input")
        .arg(&input)
        .args(["--filter", "country:Brazil, division"])
        .arg("--output")
        .arg(&output)
        .output()
        .unwrap();
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Malformed filter clause 'division'"));
    assert!(!output.exists());
}
