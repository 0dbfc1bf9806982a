
use super::*;
use crate::{
    obs::{CapturingSink, ChangeEvent, with_change_sink},
    test_support::{keyed_values_model, lights_model, version_model, zone_list_model},
    validate::DataErrorKind,
};

const NAME: usize = 0;
const MODE: usize = 1;
const MULTIPLIER: usize = 2;

// relative offsets inside one keyed-values group
const KEY: usize = 0;
const VALUE: usize = 1;

fn keyed() -> Record {
    Record::new(Arc::new(keyed_values_model()))
}

fn keyed_with(groups: &[(&str, &str)]) -> Record {
    let mut record = keyed();
    for &(key, value) in groups {
        assert!(record.push_extensible_group_with(&[key, value]).record().is_some());
    }

    record
}

fn keys(record: &Record) -> Vec<String> {
    record
        .extensible_groups()
        .iter()
        .map(|group| group.get_string(record, KEY, false).unwrap_or_default())
        .collect()
}

///
/// SHAPE
///

#[test]
fn fixed_prefix_is_allocated_up_front() {
    let record = keyed();

    assert_eq!(record.num_fields(), 3);
    assert_eq!(record.num_nonextensible_fields(), 3);
    assert_eq!(record.num_extensible_groups(), 0);
    assert!(record.is_empty(MODE));
    assert!(record.is_empty(99));
}

#[test]
fn out_of_range_access_is_soft() {
    let mut record = keyed();

    assert_eq!(record.get_string(99, true), None);
    assert_eq!(record.get_field(99, false), None);
    assert_eq!(record.get_double(99, true), None);
    assert!(!record.set_string(99, "x"));
    assert!(!record.set_string_with(99, "x", false));
    assert_eq!(record.field_comment(99, true), None);
}

#[test]
fn pushes_grow_by_whole_groups() {
    let mut record = keyed();

    for k in 1..=5 {
        let group = record.push_extensible_group();

        assert_eq!(group.group_index(&record), k - 1);
        assert_eq!(record.num_extensible_groups(), k);
        assert_eq!(record.num_fields(), 3 + k * 2);
    }
}

///
/// READS
///

#[test]
fn defaults_fill_unset_fields_only_on_request() {
    let record = keyed();

    assert_eq!(record.get_string(MODE, true).as_deref(), Some("Sum"));
    assert_eq!(record.get_string(MODE, false), None);
    assert_eq!(record.get_field(MODE, true).as_deref(), Some("Sum"));
    assert_eq!(record.get_double(MULTIPLIER, true), Some(1.0));
    assert_eq!(record.get_double(MULTIPLIER, false), None);
    assert_eq!(record.get_string(NAME, true), None);
}

#[test]
fn numeric_getters_convert_tokens() {
    let mut record = keyed();

    assert!(record.set_string_with(MULTIPLIER, "3.7", false));
    assert_eq!(record.get_double(MULTIPLIER, false), Some(3.7));
    assert_eq!(record.get_int(MULTIPLIER, false), Some(3));
    assert_eq!(record.get_unsigned(MULTIPLIER, false), Some(3));

    assert!(record.set_string_with(MULTIPLIER, "-2", false));
    assert_eq!(record.get_int(MULTIPLIER, false), Some(-2));
    assert_eq!(record.get_unsigned(MULTIPLIER, false), None);

    assert!(record.set_string_with(MULTIPLIER, "lots", false));
    assert_eq!(record.get_double(MULTIPLIER, false), None);
}

#[test]
fn autosize_is_stored_but_never_numeric() {
    let mut record = keyed();
    let group = record.push_extensible_group();

    assert!(group.set_string(&mut record, VALUE, "Autosize"));
    assert_eq!(
        group.get_string(&record, VALUE, false).as_deref(),
        Some("Autosize")
    );
    assert_eq!(group.get_double(&record, VALUE, false), None);

    // Multiplier is not autosizable
    assert!(!record.set_string(MULTIPLIER, "autosize"));
}

///
/// WRITES
///

#[test]
fn unchecked_writes_store_literals_and_checked_writes_refuse() {
    let mut record = keyed();
    assert!(record.set_double(MULTIPLIER, 2.5));

    assert!(!record.set_string(MULTIPLIER, "foo"));
    assert_eq!(record.get_field(MULTIPLIER, false).as_deref(), Some("2.5"));

    assert!(record.set_string_with(MULTIPLIER, "foo", false));
    assert_eq!(record.get_field(MULTIPLIER, false).as_deref(), Some("foo"));
}

#[test]
fn choice_keys_and_bounds_are_enforced() {
    let mut record = keyed();

    assert!(record.set_string(MODE, "max"));
    assert!(!record.set_string(MODE, "Min"));
    assert_eq!(record.get_string(MODE, false).as_deref(), Some("max"));

    assert!(record.set_double(MULTIPLIER, 0.0));
    assert!(!record.set_double(MULTIPLIER, -1.0));
    assert!(!record.set_double(MULTIPLIER, f64::NAN));
    assert!(!record.set_double(MULTIPLIER, f64::INFINITY));
    assert_eq!(record.get_double(MULTIPLIER, false), Some(0.0));
}

#[test]
fn integer_fields_take_whole_numbers_only() {
    let mut record = Record::new(Arc::new(lights_model()));
    let count = 3;

    assert!(record.set_int(count, 12));
    assert!(record.set_unsigned(count, 100));
    assert!(!record.set_int(count, 101));
    assert!(!record.set_string(count, "2.5"));
    assert_eq!(record.get_unsigned(count, false), Some(100));
}

#[test]
fn empty_value_clears_a_field() {
    let mut record = keyed();
    assert!(record.set_string(MODE, "Max"));
    assert!(record.set_string(MODE, ""));

    assert!(record.is_empty(MODE));
    assert_eq!(record.get_string(MODE, true).as_deref(), Some("Sum"));
}

#[test]
fn reference_fields_without_resolver_act_as_text() {
    let mut record = Record::new(Arc::new(lights_model()));

    assert!(record.set_string(1, "Always On"));
    assert_eq!(record.get_string(1, false).as_deref(), Some("Always On"));
    assert_eq!(record.get_field(1, false).as_deref(), Some("Always On"));
    assert_eq!(record.get_target(1), None);
    assert_eq!(record.reference_fields(), vec![1]);
}

#[test]
fn pointers_store_handle_text() {
    let mut record = Record::new(Arc::new(lights_model()));
    let target = Handle::from_parts(7, 7);

    assert!(record.set_pointer(1, target));
    assert_eq!(record.get_field(1, false), Some(target.to_string()));
    assert_eq!(record.get_target(1), Some(target));

    // Design Level is not a reference field
    assert!(!record.set_pointer(2, target));
}

#[test]
fn names_live_in_the_name_field() {
    let mut record = keyed();
    assert_eq!(record.set_name("Plant Loads").as_deref(), Some("Plant Loads"));
    assert_eq!(record.name(false).as_deref(), Some("Plant Loads"));
    assert_eq!(record.get_string(NAME, false).as_deref(), Some("Plant Loads"));

    let mut version = Record::new(Arc::new(version_model()));
    assert_eq!(version.set_name("24.1"), None);
    assert_eq!(version.name(true), None);
}

///
/// GROUPS
///

#[test]
fn erase_keeps_remaining_groups_in_order() {
    let mut record = keyed_with(&[("A", "1.0"), ("B", "2.0"), ("C", "3.0")]);
    assert_eq!(record.num_extensible_groups(), 3);

    assert!(record.erase_extensible_group(1));

    assert_eq!(record.num_extensible_groups(), 2);
    assert_eq!(keys(&record), vec!["A", "C"]);
    assert!(!record.erase_extensible_group(2));
}

#[test]
fn insert_shifts_later_groups() {
    let mut record = keyed_with(&[("A", "1"), ("C", "3")]);

    let b = record.insert_extensible_group_with(1, &["B", "2"]);
    assert_eq!(b.group_index(&record), 1);
    assert_eq!(keys(&record), vec!["A", "B", "C"]);
    assert_eq!(
        record.extensible_group(2).get_double(&record, VALUE, false),
        Some(3.0)
    );

    // inserting at the count appends
    let d = record.insert_extensible_group(3);
    assert_eq!(d.group_index(&record), 3);

    // past the count is refused
    let refused = record.insert_extensible_group(9);
    assert!(refused.record().is_none());
    assert_eq!(record.num_extensible_groups(), 4);
}

#[test]
fn stale_views_read_nothing() {
    let mut record = keyed_with(&[("A", "1"), ("B", "2"), ("C", "3")]);
    let a = record.extensible_group(0);
    let c = record.extensible_group(2);

    assert!(record.erase_extensible_group(0));

    assert!(a.is_empty(&record));
    assert!(c.is_empty(&record));
    assert_eq!(c.get_string(&record, KEY, false), None);
    assert!(c.fields(&record, false).is_empty());
    assert!(!c.set_string(&mut record, KEY, "Z"));

    let c = record.refresh_group(c);
    assert_eq!(c.group_index(&record), 1);
    assert_eq!(c.get_string(&record, KEY, false).as_deref(), Some("C"));

    assert!(record.refresh_group(a).record().is_none());
}

#[test]
fn insert_before_a_view_makes_it_stale_but_not_after() {
    let mut record = keyed_with(&[("A", "1"), ("B", "2")]);
    let a = record.extensible_group(0);
    let b = record.extensible_group(1);

    record.insert_extensible_group(1);

    assert!(a.is_live(&record));
    assert!(b.is_empty(&record));
    assert_eq!(
        record.refresh_group(b).get_string(&record, KEY, false).as_deref(),
        Some("B")
    );
}

#[test]
fn pop_returns_removed_tokens() {
    let mut record = keyed_with(&[("A", "1"), ("B", "2")]);

    assert_eq!(record.pop_extensible_group(), vec!["B", "2"]);
    assert_eq!(record.pop_extensible_group(), vec!["A", "1"]);
    assert!(record.pop_extensible_group().is_empty());
    assert_eq!(record.num_fields(), 3);
}

#[test]
fn clear_leaves_the_fixed_prefix() {
    let mut record = keyed_with(&[("A", "1"), ("B", "2")]);
    assert!(record.set_string(MODE, "Max"));
    let view = record.extensible_group(0);

    let removed = record.clear_extensible_groups();

    assert_eq!(removed, vec![vec!["A", "1"], vec!["B", "2"]]);
    assert_eq!(record.num_fields(), 3);
    assert_eq!(record.get_string(MODE, false).as_deref(), Some("Max"));
    assert!(view.is_empty(&record));
    assert!(record.clear_extensible_groups().is_empty());
}

#[test]
fn non_extensible_types_never_grow() {
    let mut record = Record::new(Arc::new(version_model()));

    assert!(record.push_extensible_group().record().is_none());
    assert!(record.insert_extensible_group(0).record().is_none());
    assert_eq!(record.num_fields(), 1);
    assert_eq!(record.num_extensible_groups(), 0);
}

#[test]
fn max_groups_caps_pushes() {
    let mut record = Record::new(Arc::new(zone_list_model()));

    for _ in 0..4 {
        assert!(record.push_extensible_group().record().is_some());
    }

    assert!(record.push_extensible_group().record().is_none());
    assert_eq!(record.max_extensible_groups(), Some(4));
    assert_eq!(record.num_extensible_groups(), 4);
}

#[test]
fn invalid_group_values_roll_back_the_whole_group() {
    let mut record = keyed_with(&[("A", "1")]);
    let a = record.extensible_group(0);

    let refused = record.push_extensible_group_with(&["B", "abc"]);
    assert!(refused.record().is_none());

    let refused = record.insert_extensible_group_with(0, &["B", "-"]);
    assert!(refused.record().is_none());

    let refused = record.push_extensible_group_with(&["only one"]);
    assert!(refused.record().is_none());

    assert_eq!(record.num_extensible_groups(), 1);
    assert_eq!(record.num_fields(), 5);
    assert!(a.is_live(&record));
}

#[test]
#[should_panic(expected = "empty extensible group view")]
fn group_index_of_an_empty_view_panics() {
    let _ = ExtensibleGroup::default().group_index(&keyed());
}

#[test]
#[should_panic(expected = "empty extensible group view")]
fn group_index_of_an_erased_view_panics() {
    let mut record = keyed_with(&[("A", "1"), ("B", "2")]);
    let b = record.extensible_group(1);

    assert!(record.erase_extensible_group(1));
    assert!(b.is_empty(&record));

    let _ = b.group_index(&record);
}

#[test]
#[should_panic(expected = "empty extensible group view")]
fn group_index_of_a_foreign_view_panics() {
    let record = keyed_with(&[("A", "1")]);
    let other = keyed_with(&[("A", "1")]);

    let _ = record.extensible_group(0).group_index(&other);
}

///
/// VIEWS
///

#[test]
fn group_round_trips_values() {
    let mut record = keyed();
    let group = record.push_extensible_group();

    assert!(group.set_string(&mut record, KEY, "Lighting"));
    assert!(group.set_double(&mut record, VALUE, 0.25));
    assert_eq!(
        group.get_string(&record, KEY, false).as_deref(),
        Some("Lighting")
    );
    assert_eq!(group.get_double(&record, VALUE, false), Some(0.25));
    assert_eq!(group.fields(&record, false), vec!["Lighting", "0.25"]);
    assert_eq!(group.num_fields(&record), 2);

    // relative index past the group
    assert_eq!(group.get_string(&record, 2, false), None);
    assert!(!group.set_string(&mut record, 2, "x"));
}

#[test]
fn set_fields_is_all_or_nothing() {
    let mut record = keyed_with(&[("A", "1")]);
    let group = record.extensible_group(0);

    assert!(!group.set_fields(&mut record, &["B", "nope"]));
    assert_eq!(group.fields(&record, false), vec!["A", "1"]);

    assert!(group.set_fields(&mut record, &["B", "2"]));
    assert_eq!(group.fields(&record, false), vec!["B", "2"]);

    assert!(!group.set_fields(&mut record, &["C"]));
}

#[test]
fn clones_do_not_alias() {
    let mut record = keyed_with(&[("A", "1")]);
    let original = record.extensible_group(0);

    let copy = original.push_clone(&mut record);
    assert_eq!(copy.fields(&record, false), original.fields(&record, false));

    assert!(original.set_string(&mut record, KEY, "Changed"));
    assert_eq!(copy.get_string(&record, KEY, false).as_deref(), Some("A"));

    assert!(copy.set_double(&mut record, VALUE, 9.0));
    assert_eq!(original.get_double(&record, VALUE, false), Some(1.0));
}

#[test]
fn comments_are_cloned_only_on_request() {
    let mut record = keyed_with(&[("A", "1")]);
    let original = record.extensible_group(0);
    assert!(original.set_field_comment(&mut record, KEY, "first key"));

    let plain = original.push_clone(&mut record);
    let commented = original.push_clone_with_comments(&mut record);

    assert_eq!(plain.field_comment(&record, KEY, false), None);
    assert_eq!(
        commented.field_comment(&record, KEY, false).as_deref(),
        Some("! first key")
    );
    assert_eq!(commented.field_comments(&record), vec!["! first key", ""]);
}

#[test]
fn insert_clone_lands_at_the_requested_index() {
    let mut record = keyed_with(&[("A", "1"), ("B", "2")]);
    let b = record.extensible_group(1);

    let copy = b.insert_clone(&mut record, 0);

    assert_eq!(copy.group_index(&record), 0);
    assert_eq!(keys(&record), vec!["B", "A", "B"]);
}

#[test]
fn view_equality_is_structural() {
    let mut left = keyed_with(&[("A", "1")]);
    let right = keyed_with(&[("A", "1")]);
    let l = left.extensible_group(0);
    let r = right.extensible_group(0);

    assert_eq!(l.fields(&left, false), r.fields(&right, false));
    assert_ne!(l, r);
    assert_eq!(l, l);
    assert_eq!(l, left.extensible_group(0));

    let second = left.push_extensible_group();
    assert_ne!(l, second);
    assert_eq!(ExtensibleGroup::default(), ExtensibleGroup::default());
}

///
/// COMMENTS
///

#[test]
fn default_field_comments_name_the_field() {
    let mut record = keyed_with(&[("A", "1"), ("B", "2")]);

    assert_eq!(record.field_comment(NAME, true).as_deref(), Some("! Name"));
    assert_eq!(record.field_comment(NAME, false), None);
    assert_eq!(record.field_comment(6, true).as_deref(), Some("! Value 2 {W}"));

    assert!(record.set_field_comment(NAME, "plant name"));
    assert_eq!(
        record.field_comment(NAME, true).as_deref(),
        Some("! plant name")
    );
    assert!(!record.set_field_comment(99, "x"));
}

#[test]
fn field_comments_follow_their_groups() {
    let mut record = keyed_with(&[("A", "1"), ("B", "2")]);
    let b = record.extensible_group(1);
    assert!(b.set_field_comment(&mut record, KEY, "! keep me"));

    record.erase_extensible_group(0);
    let b = record.refresh_group(b);
    assert_eq!(
        b.field_comment(&record, KEY, false).as_deref(),
        Some("! keep me")
    );

    record.insert_extensible_group(0);
    let b = record.refresh_group(b);
    assert_eq!(b.group_index(&record), 1);
    assert_eq!(
        b.field_comment(&record, KEY, false).as_deref(),
        Some("! keep me")
    );
}

#[test]
fn object_comment_is_normalized() {
    let mut record = keyed();
    assert_eq!(record.comment(), None);

    record.set_comment("made by hand");
    assert_eq!(record.comment(), Some("! made by hand"));

    record.set_comment("  ");
    assert_eq!(record.comment(), None);
}

///
/// LOADING & COPYING
///

#[test]
fn from_fields_pads_and_splits_groups() {
    let model = Arc::new(keyed_values_model());

    let short = Record::from_fields(Arc::clone(&model), ["Loads"]).unwrap();
    assert_eq!(short.num_fields(), 3);
    assert_eq!(short.name(false).as_deref(), Some("Loads"));

    let full =
        Record::from_fields(Arc::clone(&model), ["Loads", "Max", "2", "A", "1", "B", "2"]).unwrap();
    assert_eq!(full.num_extensible_groups(), 2);
    assert_eq!(keys(&full), vec!["A", "B"]);
    assert!(full.extensible_group(1).is_live(&full));
}

#[test]
fn from_fields_rejects_malformed_lists() {
    let keyed = Arc::new(keyed_values_model());
    let err = Record::from_fields(keyed, ["n", "Sum", "1", "dangling key"]).unwrap_err();
    assert!(matches!(err, RecordError::IncompleteGroup { count: 1, .. }));

    let version = Arc::new(version_model());
    let err = Record::from_fields(version, ["24.1", "extra"]).unwrap_err();
    assert!(matches!(err, RecordError::TooManyFields { max: 1, .. }));

    let zones = Arc::new(zone_list_model());
    let values = ["List", "z1", "z2", "z3", "z4", "z5"];
    let err = Record::from_fields(zones, values).unwrap_err();
    assert!(matches!(err, RecordError::TooManyGroups { count: 5, .. }));
}

#[test]
fn record_errors_fold_into_internal_errors() {
    let err: InternalError = RecordError::UnknownObjectType("Nope".to_string()).into();

    assert_eq!(err.class, ErrorClass::NotFound);
    assert_eq!(err.origin, ErrorOrigin::Record);
}

#[test]
fn data_fields_compare_by_value() {
    let model = Arc::new(keyed_values_model());
    let left = Record::from_fields(Arc::clone(&model), ["a", "Sum", "1.0", "Key", "2"]).unwrap();
    let right = Record::from_fields(Arc::clone(&model), ["a", "SUM", "1", "key", "2.0"]).unwrap();
    let other = Record::from_fields(Arc::clone(&model), ["a", "Sum", "1.5", "Key", "2"]).unwrap();

    assert!(left.data_fields_equal(&right));
    assert!(!left.data_fields_equal(&other));
    assert!(!left.data_fields_equal(&keyed()));
}

#[test]
fn name_may_differ_only_between_copies_of_one_handle() {
    let mut original = keyed_with(&[("A", "1")]);
    original.set_name("First");

    let mut same_handle = original.clone_record(true);
    same_handle.set_name("Second");
    let mut new_handle = original.clone_record(false);
    new_handle.set_name("Second");

    assert_eq!(same_handle.handle(), original.handle());
    assert_ne!(new_handle.handle(), original.handle());
    assert!(original.data_fields_equal(&same_handle));
    assert!(!original.data_fields_equal(&new_handle));
}

///
/// SIGNALS
///

#[test]
fn checked_writes_emit_immediately() {
    let sink = CapturingSink::new();
    let mut record = keyed();
    let handle = record.handle();

    with_change_sink(sink.clone(), || {
        assert!(record.set_string(MODE, "Max"));
    });

    assert_eq!(
        sink.take(),
        vec![ChangeEvent::DataChanged {
            handle,
            object_type: "Example:KeyedValues".to_string(),
            indices: vec![MODE],
        }]
    );
}

#[test]
fn unchecked_writes_wait_for_a_flush() {
    let sink = CapturingSink::new();
    let mut record = keyed();

    with_change_sink(sink.clone(), || {
        assert!(record.set_string_with(MODE, "Max", false));
        assert!(record.set_string_with(MULTIPLIER, "4", false));
        assert!(sink.is_empty());

        record.emit_change_signals();
    });

    let events = sink.take();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        ChangeEvent::DataChanged { indices, .. } if indices == &vec![MODE, MULTIPLIER]
    ));
}

#[test]
fn rewriting_the_same_value_is_not_a_change() {
    let sink = CapturingSink::new();
    let mut record = keyed();
    assert!(record.set_string(MODE, "Max"));

    with_change_sink(sink.clone(), || assert!(record.set_string(MODE, "Max")));

    assert!(sink.is_empty());
}

#[test]
fn structural_changes_report_group_counts() {
    let sink = CapturingSink::new();
    let mut record = keyed();

    with_change_sink(sink.clone(), || {
        record.push_extensible_group();
        record.push_extensible_group();
        record.erase_extensible_group(0);
    });

    let groups: Vec<usize> = sink
        .take()
        .into_iter()
        .filter_map(|event| match event {
            ChangeEvent::StructureChanged { groups, .. } => Some(groups),
            _ => None,
        })
        .collect();
    assert_eq!(groups, vec![1, 2, 1]);
}

#[test]
fn rejected_writes_are_reported() {
    let sink = CapturingSink::new();
    let mut record = keyed();

    with_change_sink(sink.clone(), || assert!(!record.set_string(MODE, "Min")));

    assert!(matches!(
        sink.take().as_slice(),
        [ChangeEvent::WriteRejected { index: MODE, .. }]
    ));
}

#[test]
fn renames_report_the_new_name() {
    let sink = CapturingSink::new();
    let mut record = keyed();

    with_change_sink(sink.clone(), || record.set_name("Renamed"));

    let events = sink.take();
    assert!(events.iter().any(|event| matches!(
        event,
        ChangeEvent::NameChanged { name, .. } if name == "Renamed"
    )));
}

///
/// EDIT
///

#[test]
fn edit_commit_validates_once_and_emits_once() {
    let sink = CapturingSink::new();
    let mut record = keyed();

    let result = with_change_sink(sink.clone(), || {
        let mut edit = record.edit();
        assert!(edit.set_string(MODE, "Max"));
        assert!(edit.set_double(MULTIPLIER, 2.0));
        assert!(sink.is_empty());

        edit.commit()
    });

    assert!(result.is_ok());
    let events = sink.take();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        ChangeEvent::DataChanged { indices, .. } if indices == &vec![MODE, MULTIPLIER]
    ));
}

#[test]
fn edit_commit_reports_every_bad_field_and_keeps_values() {
    let mut record = keyed();

    let report = {
        let mut edit = record.edit();
        edit.set_string(MODE, "Min");
        edit.set_string(MULTIPLIER, "-3");
        let group = edit.push_extensible_group_with(&["Key", "not a number"]);
        assert!(group.record().is_some());
        assert!(!edit.set_string(99, "x"));
        assert_eq!(edit.touched().len(), 4);

        edit.commit().unwrap_err()
    };

    let kinds: Vec<(Option<usize>, DataErrorKind)> =
        report.iter().map(|error| (error.index, error.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            (Some(MODE), DataErrorKind::DataType),
            (Some(MULTIPLIER), DataErrorKind::NumericBound),
            (Some(4), DataErrorKind::DataType),
        ]
    );
    assert_eq!(record.get_field(MODE, false).as_deref(), Some("Min"));
}

#[test]
fn dropping_an_uncommitted_edit_still_flushes() {
    let sink = CapturingSink::new();
    let mut record = keyed();

    with_change_sink(sink.clone(), || {
        let mut edit = record.edit();
        edit.set_int(MULTIPLIER, 3);
    });

    assert_eq!(sink.len(), 1);
    assert_eq!(record.get_int(MULTIPLIER, false), Some(3));
}

///
/// VALIDITY
///

#[test]
fn final_validity_needs_required_fields_and_groups() {
    let mut record = keyed();
    assert!(record.is_valid(StrictnessLevel::Draft));

    let report = record.validity_report(StrictnessLevel::Final);
    assert!(report
        .iter()
        .any(|error| error.index.is_none() && error.kind == DataErrorKind::NumberOfGroups));

    record.push_extensible_group();
    let report = record.validity_report(StrictnessLevel::Final);
    assert_eq!(
        report.for_field(3).map(|error| error.kind).collect::<Vec<_>>(),
        vec![DataErrorKind::NullAndRequired]
    );

    let group = record.extensible_group(0);
    assert!(group.set_string(&mut record, KEY, "A"));
    assert!(record.is_valid(StrictnessLevel::Final));
}

#[test]
fn unchecked_garbage_shows_up_in_the_report() {
    let mut record = keyed();
    assert!(record.set_string_with(MULTIPLIER, "foo", false));

    assert!(!record.is_valid(StrictnessLevel::Draft));
    assert!(record.is_valid(StrictnessLevel::None));
}
