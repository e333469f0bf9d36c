use std::path::Path;

use tempfile::TempDir;

use precios_merge::{Frame, MergeConfig, run};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_csv(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

/// Standard two-store directory: one DIA branch in Santa Fe, one Coto
/// branch in Córdoba.
fn write_stores(dir: &Path) {
    write_csv(
        dir,
        "sucursales.csv",
        "id,comercioId,banderaId,banderaDescripcion,comercioRazonSocial,provincia\n\
         9-1-1,9,1,Supermercados DIA,Dia SA,AR-S\n\
         10-2-5,10,2,Coto,Coto CICSA,AR-X\n",
    );
}

fn write_products(dir: &Path) {
    write_csv(
        dir,
        "productos.csv",
        "id,marca,nombre,presentacion,categoria1,categoria2,categoria3\n\
         779,Taragui,Yerba Mate,1 kg,Almacén,Infusiones,Yerba\n\
         100,Ledesma,Azúcar,1 kg,Almacén,Endulzantes,Azúcar\n",
    );
}

fn config(dir: &TempDir) -> MergeConfig {
    MergeConfig {
        data_dir: dir.path().to_path_buf(),
        output: dir.path().join("variaciones.csv"),
    }
}

#[test]
fn merges_two_snapshots_and_computes_drift() {
    init_logs();
    let dir = TempDir::new().unwrap();
    write_stores(dir.path());
    write_products(dir.path());
    write_csv(
        dir.path(),
        "precios_20200101.csv",
        "sucursal_id,producto_id,precio\n9-1-1,779,100\n",
    );
    write_csv(
        dir.path(),
        "precios_20200201.csv",
        "sucursal_id,producto_id,precio\n9-1-1,779,120\n",
    );

    let summary = run(&config(&dir)).unwrap();
    assert_eq!(summary.snapshots, 2);
    assert_eq!(summary.rows, 1);

    let out = Frame::read_csv(&dir.path().join("variaciones.csv")).unwrap();
    assert_eq!(
        out.columns(),
        &[
            "cadena",
            "categoria1",
            "categoria2",
            "categoria3",
            "marca",
            "nombre",
            "precio_20200101",
            "precio_20200201",
            "producto_id",
            "provincia",
            "variacion",
            "variacion_relativa",
        ]
    );
    assert_eq!(out.value(0, "cadena"), Some("Supermercados DIA"));
    assert_eq!(out.value(0, "provincia"), Some("Santa Fe"));
    assert_eq!(out.value(0, "variacion"), Some("20"));
    assert_eq!(out.value(0, "variacion_relativa"), Some("20"));
}

#[test]
fn only_pairs_present_in_every_snapshot_survive() {
    init_logs();
    let dir = TempDir::new().unwrap();
    write_stores(dir.path());
    write_products(dir.path());
    // snapshot A covers products {779, 100}; B covers {100} plus a product
    // unknown to the catalog
    write_csv(
        dir.path(),
        "precios_20200101.csv",
        "sucursal_id,producto_id,precio\n9-1-1,779,100\n9-1-1,100,50\n",
    );
    write_csv(
        dir.path(),
        "precios_20200201.csv",
        "sucursal_id,producto_id,precio\n9-1-1,100,55\n9-1-1,404,10\n",
    );

    let summary = run(&config(&dir)).unwrap();
    assert_eq!(summary.rows, 1);
    let out = Frame::read_csv(&dir.path().join("variaciones.csv")).unwrap();
    assert_eq!(out.value(0, "producto_id"), Some("100"));
    assert_eq!(out.value(0, "variacion"), Some("5"));
    assert_eq!(out.value(0, "variacion_relativa"), Some("10"));
}

#[test]
fn same_chain_in_different_provinces_never_merges() {
    init_logs();
    let dir = TempDir::new().unwrap();
    // two DIA branches, one per province: same chain, different id_prov
    write_csv(
        dir.path(),
        "sucursales.csv",
        "id,comercioId,banderaId,banderaDescripcion,provincia\n\
         9-1-1,9,1,Supermercados DIA,AR-S\n\
         9-1-2,9,1,Supermercados DIA,AR-X\n",
    );
    write_products(dir.path());
    write_csv(
        dir.path(),
        "precios_20200101.csv",
        "sucursal_id,producto_id,precio\n9-1-1,779,100\n",
    );
    write_csv(
        dir.path(),
        "precios_20200201.csv",
        "sucursal_id,producto_id,precio\n9-1-2,779,120\n",
    );

    let summary = run(&config(&dir)).unwrap();
    assert_eq!(summary.rows, 0);
}

#[test]
fn zero_overlap_yields_an_empty_well_formed_table() {
    init_logs();
    let dir = TempDir::new().unwrap();
    write_stores(dir.path());
    write_products(dir.path());
    write_csv(
        dir.path(),
        "precios_20200101.csv",
        "sucursal_id,producto_id,precio\n9-1-1,779,100\n",
    );
    write_csv(
        dir.path(),
        "precios_20200201.csv",
        "sucursal_id,producto_id,precio\n10-2-5,100,50\n",
    );

    let summary = run(&config(&dir)).unwrap();
    assert_eq!(summary.rows, 0);
    let out = Frame::read_csv(&dir.path().join("variaciones.csv")).unwrap();
    assert!(out.is_empty());
    assert!(out.col("variacion").is_some());
    assert!(out.col("precio_20200101").is_some());
}

#[test]
fn a_single_snapshot_is_rejected() {
    init_logs();
    let dir = TempDir::new().unwrap();
    write_stores(dir.path());
    write_products(dir.path());
    write_csv(
        dir.path(),
        "precios_20200101.csv",
        "sucursal_id,producto_id,precio\n9-1-1,779,100\n",
    );
    assert!(run(&config(&dir)).is_err());
}

#[test]
fn three_snapshots_keep_one_price_column_each() {
    init_logs();
    let dir = TempDir::new().unwrap();
    write_stores(dir.path());
    write_products(dir.path());
    for (name, price) in [
        ("precios_20200101.csv", "100"),
        ("precios_20200115.csv", "500"),
        ("precios_20200201.csv", "110"),
    ] {
        write_csv(
            dir.path(),
            name,
            &format!("sucursal_id,producto_id,precio\n9-1-1,779,{price}\n"),
        );
    }

    run(&config(&dir)).unwrap();
    let out = Frame::read_csv(&dir.path().join("variaciones.csv")).unwrap();
    let price_cols: Vec<&str> = out
        .columns()
        .iter()
        .map(String::as_str)
        .filter(|c| c.starts_with("precio_"))
        .collect();
    assert_eq!(
        price_cols,
        ["precio_20200101", "precio_20200115", "precio_20200201"]
    );
    // drift compares the endpoints only
    assert_eq!(out.value(0, "variacion"), Some("10"));
}
