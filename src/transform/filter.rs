//! Column filtering: the neighbourhood-area columns are not used past this point.

use crate::domain::{Features, Listing, RawListing};

/// Project a record onto `Listing`, dropping `sqft_living15` and `sqft_lot15`.
pub fn drop_neighbor_columns(raw: &RawListing, features: Features) -> Listing {
    Listing {
        id: raw.id,
        date: raw.date,
        price: raw.price,
        bedrooms: raw.bedrooms,
        bathrooms: raw.bathrooms,
        sqft_living: raw.sqft_living,
        sqft_lot: raw.sqft_lot,
        floors: raw.floors,
        waterfront: raw.waterfront,
        view: raw.view,
        condition: raw.condition,
        grade: raw.grade,
        sqft_above: raw.sqft_above,
        sqft_basement: raw.sqft_basement,
        yr_built: raw.yr_built,
        yr_renovated: raw.yr_renovated,
        zipcode: raw.zipcode,
        lat: raw.lat,
        long: raw.long,
        features,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::raw;
    use crate::transform::derive;

    #[test]
    fn keeps_every_other_column() {
        let r = raw(42, 98103, 450_000.0, 3);
        let listing = drop_neighbor_columns(&r, derive(&r));
        assert_eq!(listing.id, 42);
        assert_eq!(listing.zipcode, 98103);
        assert_eq!(listing.price, 450_000.0);
        assert_eq!(listing.date, r.date);
        assert_eq!(listing.lat, r.lat);
        assert_eq!(listing.features.month, 3);
    }
}
