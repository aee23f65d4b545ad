use geocoin_core::{Index, Index2, LatLng};

/// Five decimals is roughly one meter, finer than a tile.
pub(crate) fn format_position(position: LatLng) -> String {
    format!("{:.5}, {:.5}", position.lat, position.lng)
}

pub(crate) fn format_coins(coins: u32) -> String {
    match coins {
        1 => "1 coin".to_string(),
        n => format!("{} coins", n),
    }
}

/// Rows of the neighborhood as drawn on screen: north at the top, west on the left.
pub(crate) fn grid_rows(center: Index2, radius: Index) -> impl Iterator<Item = Vec<Index2>> {
    let (ci, cj) = center;
    let radius = radius.max(0);
    (-radius..=radius)
        .rev()
        .map(move |di| (-radius..=radius).map(|dj| (ci + di, cj + dj)).collect::<Vec<_>>())
}

/// Helper function to ask the user before a destructive action
pub(crate) fn confirm(message: &str) -> bool {
    gloo::dialogs::confirm(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_rows_put_north_first() {
        let rows: Vec<_> = grid_rows((10, 20), 1).collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec![(11, 19), (11, 20), (11, 21)]);
        assert_eq!(rows[2], vec![(9, 19), (9, 20), (9, 21)]);
    }

    #[test]
    fn coins_pluralize() {
        assert_eq!(format_coins(0), "0 coins");
        assert_eq!(format_coins(1), "1 coin");
        assert_eq!(format_coins(12), "12 coins");
    }

    #[test]
    fn position_is_rounded() {
        assert_eq!(
            format_position(LatLng::new(36.98949379578401, -122.06277128548504)),
            "36.98949, -122.06277"
        );
    }
}
