//! Default colors handed to entities the operator added by hand.

const PALETTE: [&str; 8] = [
    "#EF4444", "#F59E0B", "#10B981", "#3B82F6", "#8B5CF6", "#EC4899", "#14B8A6", "#F97316",
];

/// Palette color for the entity at `index`, cycling past the end.
pub(crate) fn color_for(index: usize) -> String {
    PALETTE[index % PALETTE.len()].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_past_the_end() {
        assert_eq!(color_for(0), color_for(PALETTE.len()));
        assert_ne!(color_for(0), color_for(1));
    }
}
