use models::Unit;

/// Units sharing one bedroom/bathroom layout.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitMixRow {
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub count: usize,
    pub total_monthly_rent: f64,
    pub average_rent: f64,
}

/// Groups the rent roll by layout, ordered by bedrooms then bathrooms.
pub fn unit_mix(units: &[Unit]) -> Vec<UnitMixRow> {
    let mut rows: Vec<UnitMixRow> = Vec::new();
    for unit in units {
        match rows
            .iter_mut()
            .find(|r| r.bedrooms == unit.bedrooms && r.bathrooms == unit.bathrooms)
        {
            Some(row) => {
                row.count += 1;
                row.total_monthly_rent += unit.rent;
            }
            None => rows.push(UnitMixRow {
                bedrooms: unit.bedrooms,
                bathrooms: unit.bathrooms,
                count: 1,
                total_monthly_rent: unit.rent,
                average_rent: 0.0,
            }),
        }
    }
    for row in rows.iter_mut() {
        row.average_rent = row.total_monthly_rent / row.count as f64;
    }
    rows.sort_by(|a, b| {
        a.bedrooms
            .cmp(&b.bedrooms)
            .then(a.bathrooms.total_cmp(&b.bathrooms))
    });
    rows
}
