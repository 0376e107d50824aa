/// Tests for the label-merge pipeline
#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::labels::*;
    use crate::table::{Column, Table};
    use crate::types::Cell;

    const DOT: &str = "●";

    fn t(s: &str) -> Cell {
        Cell::text(s)
    }

    fn i(v: i64) -> Cell {
        Cell::Integer(v)
    }

    /// A trimmed-down master sample export with two product columns
    fn raw_export() -> Table {
        let headers = [
            "PartsClass",
            "PartsCode",
            "PartsName",
            "Conn",
            "AcceNo",
            "ExteNo",
            "Length",
            "Method",
            "Qty",
            "Attachment Process",
            "7M0A-1 X",
            "7M0B-1 X",
        ];
        let m = Cell::Missing;
        Table::from_rows(
            headers.iter().map(|s| s.to_string()).collect(),
            vec![
                vec![t("C1"), t("P100"), t("WIRE"), i(12), t("A"), i(3), i(150), t("M1"), i(1), t("AP"), t(DOT), t(DOT)],
                vec![t("C2"), t("P200"), t("CLIP"), i(7), m.clone(), i(1), m.clone(), t("M2"), i(2), t("AP"), t(DOT), m.clone()],
                vec![t("C3"), t("P300"), t("TAPE"), m.clone(), m.clone(), m.clone(), m.clone(), t("M1"), i(1), t("AP"), m.clone(), t(DOT)],
            ],
        )
        .unwrap()
    }

    fn names(table: &Table) -> Vec<&str> {
        table.column_names().collect()
    }

    #[test]
    fn test_try_parse_key() {
        assert_eq!(try_parse_key("12A3"), Some(123));
        assert_eq!(try_parse_key("0042"), Some(42));
        assert_eq!(try_parse_key("no digits"), None);
        assert_eq!(try_parse_key(""), None);
        // Too long for an i64
        assert_eq!(try_parse_key("99999999999999999999999"), None);
    }

    #[test]
    fn test_concat_key_builds_integer_key_and_drops_sources() {
        let table = concat_key(raw_export(), &LabelLayout::default()).unwrap();

        assert!(!table.contains("AcceNo"));
        assert!(!table.contains("ExteNo"));
        assert_eq!(table.column("Conn").unwrap().cells, vec![i(123), i(71), Cell::Missing]);
    }

    #[test]
    fn test_concat_key_requires_source_columns() {
        let table = raw_export().drop_columns(&["ExteNo"]).unwrap();
        let err = concat_key(table, &LabelLayout::default()).unwrap_err();
        assert!(matches!(err, Error::MissingColumn { name } if name == "ExteNo"));
    }

    #[test]
    fn test_rename_suffix_strips_and_marks() {
        let table = rename_suffix(raw_export(), "Attachment Process", 2, "**").unwrap();
        let n = names(&table);
        assert_eq!(&n[9..], &["Attachment Process", "7M0A-1**", "7M0B-1**"]);
        // Columns before the start are untouched
        assert_eq!(n[0], "PartsClass");
    }

    #[test]
    fn test_rename_suffix_zero_strip_only_appends_marker() {
        let table = rename_suffix(raw_export(), "Attachment Process", 0, "**").unwrap();
        assert!(table.contains("7M0A-1 X**"));
    }

    #[test]
    fn test_rename_suffix_strip_longer_than_name() {
        let table = Table::new(vec![Column::missing("Start", 1), Column::missing("AB", 1)]).unwrap();
        let table = rename_suffix(table, "Start", 10, "**").unwrap();
        assert_eq!(names(&table), vec!["Start", "**"]);
    }

    #[test]
    fn test_rename_collision_is_reported() {
        let table = Table::new(vec![
            Column::missing("Start", 1),
            Column::missing("AB 1", 1),
            Column::missing("AB 2", 1),
        ])
        .unwrap();
        let err = rename_suffix(table, "Start", 2, "**").unwrap_err();
        assert!(matches!(err, Error::DuplicateColumn { name } if name == "AB**"));
    }

    #[test]
    fn test_rename_unknown_start_column_is_configuration_error() {
        let err = rename_suffix(raw_export(), "Nope", 2, "**").unwrap_err();
        assert!(matches!(err, Error::UnknownColumn { option: "--start-column", .. }));
    }

    #[test]
    fn test_expand_symbol_uses_column_name() {
        let table = rename_suffix(raw_export(), "Attachment Process", 2, "**").unwrap();
        let table = expand_symbol(table, DOT);
        assert_eq!(table.column("7M0A-1**").unwrap().cells, vec![t("7M0A-1**"), t("7M0A-1**"), Cell::Missing]);
        assert_eq!(table.column("7M0B-1**").unwrap().cells, vec![t("7M0B-1**"), Cell::Missing, t("7M0B-1**")]);
    }

    #[test]
    fn test_annotate_length_only_where_present() {
        let table = annotate_length(raw_export(), &LabelLayout::default()).unwrap();
        assert_eq!(table.column("PartsName").unwrap().cells, vec![t("WIRE L=150"), t("CLIP"), t("TAPE")]);
    }

    #[test]
    fn test_annotate_length_without_length_column() {
        let table = raw_export().drop_columns(&["Length"]).unwrap();
        let annotated = annotate_length(table.clone(), &LabelLayout::default()).unwrap();
        assert_eq!(annotated, table);
    }

    #[test]
    fn test_prune_columns() {
        let table = prune_columns(raw_export(), &LabelLayout::default()).unwrap();
        assert_eq!(names(&table), vec!["PartsName", "Conn", "AcceNo", "ExteNo", "7M0A-1 X", "7M0B-1 X"]);
    }

    #[test]
    fn test_prune_tolerates_missing_length_only() {
        let layout = LabelLayout::default();
        let no_length = raw_export().drop_columns(&["Length"]).unwrap();
        assert!(prune_columns(no_length, &layout).is_ok());

        let no_method = raw_export().drop_columns(&["Method"]).unwrap();
        let err = prune_columns(no_method, &layout).unwrap_err();
        assert!(matches!(err, Error::MissingColumn { name } if name == "Method"));
    }

    #[test]
    fn test_row_count_invariant_before_transpose() {
        let layout = LabelLayout::default();
        let rows = raw_export().row_count();

        let table = concat_key(raw_export(), &layout).unwrap();
        assert_eq!(table.row_count(), rows);
        let table = rename_suffix(table, "Attachment Process", 2, "**").unwrap();
        assert_eq!(table.row_count(), rows);
        let table = expand_symbol(table, DOT);
        assert_eq!(table.row_count(), rows);
        let table = annotate_length(table, &layout).unwrap();
        assert_eq!(table.row_count(), rows);
        let table = prune_columns(table, &layout).unwrap();
        assert_eq!(table.row_count(), rows);
    }

    #[test]
    fn test_compaction_moves_missing_to_bottom() {
        let table = Table::from_rows(
            vec!["a".into(), "b".into(), "c".into()],
            vec![
                vec![t("x1"), Cell::Missing, t("y1")],
                vec![Cell::Missing, Cell::Missing, t("y2")],
                vec![t("x3"), t("z3"), Cell::Missing],
            ],
        )
        .unwrap();

        let compacted = transpose_compact(table);
        for column in compacted.columns() {
            let first_missing = column.cells.iter().position(|c| c.is_missing()).unwrap_or(column.cells.len());
            assert!(column.cells[first_missing..].iter().all(|c| c.is_missing()), "hole left in {}", column.name);
        }
        // Former row 0 -> column "0": [x1, Missing, y1] -> [x1, y1, Missing]
        assert_eq!(compacted.column("0").unwrap().cells, vec![t("x1"), t("y1"), Cell::Missing]);
        assert_eq!(compacted.column("1").unwrap().cells, vec![t("y2"), Cell::Missing, Cell::Missing]);
        assert_eq!(compacted.column("2").unwrap().cells, vec![t("x3"), t("z3"), Cell::Missing]);
    }

    #[test]
    fn test_spacer_property() {
        let table = Table::new((0..4).map(|n| Column::new(n.to_string(), vec![t("v"); 2])).collect()).unwrap();
        let spaced = insert_spacers(table).unwrap();

        assert_eq!(spaced.column_count(), 2 * 4 - 1);
        assert_eq!(names(&spaced), vec!["0", "Blank_0", "1", "Blank_1", "2", "Blank_2", "3"]);
        for (idx, column) in spaced.columns().iter().enumerate() {
            let all_missing = column.cells.iter().all(|c| c.is_missing());
            assert_eq!(all_missing, idx % 2 == 1, "column {} at {}", column.name, idx);
        }
    }

    #[test]
    fn test_spacers_on_single_column() {
        let table = Table::new(vec![Column::new("0", vec![t("v")])]).unwrap();
        assert_eq!(insert_spacers(table).unwrap().column_count(), 1);
    }

    #[test]
    fn test_full_transform() {
        let out = transform(raw_export(), &LabelLayout::default(), "Attachment Process", 2, DOT).unwrap();

        assert_eq!(names(&out), vec!["0", "Blank_0", "1", "Blank_1", "2"]);
        // PartsName, Conn and the two product columns survive as rows
        assert_eq!(out.row_count(), 4);

        assert_eq!(out.column("0").unwrap().cells, vec![t("WIRE L=150"), i(123), t("7M0A-1**"), t("7M0B-1**")]);
        assert_eq!(out.column("1").unwrap().cells, vec![t("CLIP"), i(71), t("7M0A-1**"), Cell::Missing]);
        assert_eq!(out.column("2").unwrap().cells, vec![t("TAPE"), t("7M0B-1**"), Cell::Missing, Cell::Missing]);
        assert!(out.column("Blank_1").unwrap().cells.iter().all(|c| c.is_missing()));
    }

    #[test]
    fn test_transform_with_custom_marker() {
        let layout = LabelLayout { marker: "##".to_string(), ..LabelLayout::default() };
        let out = transform(raw_export(), &layout, "Attachment Process", 2, DOT).unwrap();
        assert_eq!(out.column("0").unwrap().cells[2], t("7M0A-1##"));
    }

    #[test]
    fn test_transform_rejects_unknown_start_column() {
        let err = transform(raw_export(), &LabelLayout::default(), "Product", 2, DOT).unwrap_err();
        assert!(matches!(err, Error::UnknownColumn { name, .. } if name == "Product"));
    }

    #[test]
    fn test_count_applicable_from_start_column() {
        let counts = count_applicable(&raw_export(), "Attachment Process", DOT).unwrap();
        let pairs: Vec<(&str, usize)> = counts.iter().map(|c| (c.column.as_str(), c.count)).collect();
        assert_eq!(pairs, vec![("Attachment Process", 0), ("7M0A-1 X", 2), ("7M0B-1 X", 2)]);
        assert_eq!(highest_counts(&counts), vec!["7M0A-1 X", "7M0B-1 X"]);
    }

    #[test]
    fn test_highest_counts_empty() {
        assert!(highest_counts(&[]).is_empty());
    }
}
