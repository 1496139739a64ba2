use std::io::Write;

use house_recs::app::pipeline::run_pipeline;
use house_recs::domain::DashboardConfig;
use house_recs::error::{EXIT_EMPTY, EXIT_INPUT};
use house_recs::report::{PriceRange, Selection, filter_by_price, recommendations};

const HEADER: &str = "id,date,price,bedrooms,bathrooms,sqft_living,sqft_lot,floors,waterfront,view,condition,grade,sqft_above,sqft_basement,yr_built,yr_renovated,zipcode,lat,long,sqft_living15,sqft_lot15";

/// `(id, date, price, condition, grade, yr_renovated, zipcode)`
const ROWS: [(u64, &str, u32, u8, u8, i32, u32); 8] = [
    (1, "20140513T000000", 180_000, 4, 8, 0, 98001),
    (2, "20140613T000000", 200_000, 4, 8, 0, 98001),
    (3, "20140713T000000", 220_000, 3, 9, 1990, 98001),
    (4, "20140713T000000", 260_000, 5, 9, 0, 98001),
    (5, "20141013T000000", 150_000, 4, 8, 0, 98103),
    (6, "20141013T000000", 400_000, 4, 8, 2005, 98103),
    (7, "20150113T000000", 390_000, 4, 7, 0, 98103),
    (8, "20150213T000000", 500_000, 4, 9, 0, 98103),
];

fn write_csv(header: bool) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    if header {
        writeln!(file, "{HEADER}").unwrap();
    }
    for (id, date, price, condition, grade, yr_renovated, zipcode) in ROWS {
        writeln!(
            file,
            "{id},\"{date}\",{price},3,1.5,1500,6000,\"1\",0,0,{condition},{grade},1500,0,1960,{yr_renovated},\"{zipcode}\",47.5,-122.3,1400,6000"
        )
        .unwrap();
    }
    file.flush().unwrap();
    file
}

fn config(path: &std::path::Path) -> DashboardConfig {
    DashboardConfig {
        data_path: path.to_path_buf(),
        price_low_k: None,
        price_high_k: None,
        zipcode: None,
        price_step_k: 10,
        table_limit: None,
    }
}

#[test]
fn pipeline_flags_buys_and_projects_resale() {
    let file = write_csv(true);
    let out = run_pipeline(&config(file.path())).unwrap();

    assert!(out.header_skipped);
    assert_eq!(out.rows_read, ROWS.len());
    assert_eq!(out.summary.listings, ROWS.len());
    assert_eq!(out.summary.zipcodes, 2);

    // 98001: median 210k; monthly peak is July at 240k.
    let m = out.markets[&98001];
    assert_eq!(m.median_price, 210_000.0);
    assert_eq!(m.high_month, 7);
    assert_eq!(m.high_median_price, 240_000.0);

    let by_id = |id: u64| out.listings.iter().find(|a| a.listing.id == id).unwrap();

    let a = by_id(1);
    assert!(a.buy);
    assert!((a.sell_price.unwrap() - 234_000.0).abs() < 1e-6);
    assert!((a.profit.unwrap() - 54_000.0).abs() < 1e-6);

    // Condition 3 is never a buy.
    assert!(!by_id(3).buy);
    assert_eq!(by_id(3).sell_price, None);
    assert!(by_id(3).listing.features.renovated);

    // Grade 7 is never a buy.
    assert!(!by_id(7).buy);

    for a in &out.listings {
        assert_eq!(a.listing.features.renovated, a.listing.yr_renovated > 0);
        assert_eq!(a.sell_price.is_some(), a.buy);
        assert_eq!(a.profit.is_some(), a.buy);
    }
}

#[test]
fn full_bounds_view_returns_every_recommendation() {
    let file = write_csv(false);
    let out = run_pipeline(&config(file.path())).unwrap();
    assert!(!out.header_skipped);

    let recs = recommendations(&out.listings);
    let view = out.view(&Selection::default());
    assert_eq!(view.filtered, recs);
    assert_eq!(view.recommended, out.summary.buys);

    let bounds = view.bounds.unwrap();
    assert_eq!(filter_by_price(&recs, PriceRange::full(bounds)).len(), recs.len());
}

#[test]
fn narrowed_selection_is_clamped_and_totalled() {
    let file = write_csv(true);
    let out = run_pipeline(&config(file.path())).unwrap();

    let sel = Selection {
        price: Some(PriceRange { low_k: 0, high_k: 190 }),
        zipcode: Some(98103),
    };
    let view = out.view(&sel);
    let range = view.range.unwrap();
    assert_eq!(range.low_k, view.bounds.unwrap().min_k);
    assert!(view.filtered.iter().all(|r| r.price <= 190_000.0));
    assert_eq!(view.totals.count, view.filtered.len());
    assert_eq!(view.zipcode, Some(98103));
    assert_eq!(view.analytics.unwrap().listings, 4);
}

#[test]
fn header_only_file_is_empty() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    file.flush().unwrap();

    let err = run_pipeline(&config(file.path())).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_EMPTY);
}

#[test]
fn missing_file_is_an_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_pipeline(&config(&dir.path().join("missing.csv"))).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_INPUT);
}
