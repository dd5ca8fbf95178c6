use tabkit::{
    column_stats, filter, group, join, merge, sort, sort_numeric, try_parse_number, CsvLoader,
    CsvOptions, JoinMode, Record, StatsError, Store,
};

const PEOPLE: &str = "\
name,age,city,salary
Alice,30,New York,75000
Bob,25,Los Angeles,65000
Charlie,35,Chicago,80000
Diana,28,New York,70000
Eve,32,Los Angeles,72000
Frank,29,Chicago,68000
";

const DEPARTMENTS: &str = "\
name,department
Alice,Engineering
Bob,Marketing
Charlie,Engineering
Diana,Sales
Eve,Marketing
";

fn load(text: &str, name: &str) -> Store {
    CsvLoader::read_from(text.as_bytes(), name, &CsvOptions::default())
}

fn names(store: &Store) -> Vec<&str> {
    store.iter().map(|r| r.get("name").unwrap_or("")).collect()
}

#[test]
fn test_filter_high_earners() {
    let people = load(PEOPLE, "people");
    let above = |r: &Record| {
        r.get("salary")
            .and_then(try_parse_number)
            .map_or(false, |s| s > 70000.0)
    };
    let high = filter(&people, above);
    let rest = filter(&people, |r| !above(r));

    assert_eq!(names(&high), vec!["Alice", "Charlie", "Eve"]);
    assert_eq!(high.len() + rest.len(), people.len());
    assert_eq!(people.len(), 6, "filter must not mutate its input");
}

#[test]
fn test_sort_by_age_text_and_numeric() {
    let people = load(PEOPLE, "people");
    let by_age = sort(&people, "age", false);
    assert_eq!(
        names(&by_age),
        vec!["Bob", "Diana", "Frank", "Alice", "Eve", "Charlie"]
    );

    let by_salary = sort_numeric(&people, "salary", true);
    assert_eq!(names(&by_salary)[0], "Charlie");
}

#[test]
fn test_sort_stability_example() {
    let mut store = Store::new("s");
    store.push(Record::from_pairs([("k", "A"), ("v", "1")]));
    store.push(Record::from_pairs([("k", "A"), ("v", "2")]));

    for descending in [false, true] {
        let sorted = sort(&store, "k", descending);
        let vs: Vec<_> = sorted.iter().map(|r| r.get("v").unwrap()).collect();
        assert_eq!(vs, vec!["1", "2"]);
    }
}

#[test]
fn test_group_by_city_partitions() {
    let people = load(PEOPLE, "people");
    let groups = group(&people, "city");

    assert_eq!(
        groups.keys().collect::<Vec<_>>(),
        vec![Some("New York"), Some("Los Angeles"), Some("Chicago")]
    );

    let regrouped: Vec<Record> = groups
        .iter()
        .flat_map(|g| g.records.iter().cloned())
        .collect();
    assert_eq!(regrouped.len(), people.len());
    for record in &people.records {
        assert_eq!(regrouped.iter().filter(|r| *r == record).count(), 1);
    }
}

#[test]
fn test_salary_stats() {
    let people = load(PEOPLE, "people");
    let stats = column_stats(&people, "salary").unwrap();
    assert_eq!(stats.count, 6);
    assert_eq!(stats.min, 65000.0);
    assert_eq!(stats.max, 80000.0);
    assert_eq!(stats.sum, 430000.0);
    assert_eq!(stats.median, 71000.0);
    assert_eq!(stats.mode, None);

    assert_eq!(
        column_stats(&people, "city"),
        Err(StatsError::NoNumericValues {
            column: "city".to_string()
        })
    );
}

#[test]
fn test_column_mutation_flow() {
    let mut people = load(PEOPLE, "people");
    people.add_column("bonus", "0");
    people.update_column("bonus", |v| {
        format!("{}", try_parse_number(v).unwrap_or(0.0) * 0.1)
    });
    // Updating a column nobody has is a silent no-op
    assert_eq!(people.update_column("total_compensation", |v| v.to_string()), 0);
    assert!(people.iter().all(|r| !r.contains_key("total_compensation")));

    assert!(people.iter().all(|r| r.get("bonus") == Some("0")));
    people.delete_column("age");
    assert_eq!(people.header.names(), &["name", "city", "salary", "bonus"]);
    assert_eq!(
        people.records[0].keys().collect::<Vec<_>>(),
        vec!["name", "city", "salary", "bonus"]
    );
}

#[test]
fn test_left_merge_with_departments() {
    let people = load(PEOPLE, "people");
    let departments = load(DEPARTMENTS, "departments");

    let merged = merge(&people, &departments, "name", "left");
    assert_eq!(merged.len(), people.len());
    assert_eq!(merged.records[0].get("department"), Some("Engineering"));
    // Frank has no department row and gets no department field
    let frank = merged.iter().find(|r| r.get("name") == Some("Frank")).unwrap();
    assert!(!frank.contains_key("department"));
    assert_eq!(
        merged.header.names(),
        &["name", "age", "city", "salary", "department"]
    );
}

#[test]
fn test_inner_join_examples() {
    let mut left = Store::new("l");
    left.push(Record::from_pairs([("name", "A"), ("x", "1")]));
    let mut right = Store::new("r");
    right.push(Record::from_pairs([("name", "A"), ("y", "p")]));
    right.push(Record::from_pairs([("name", "A"), ("y", "q")]));

    let inner = join(&left, &right, "name", JoinMode::Inner);
    assert_eq!(
        inner.records,
        vec![
            Record::from_pairs([("name", "A"), ("x", "1"), ("y", "p")]),
            Record::from_pairs([("name", "A"), ("x", "1"), ("y", "q")]),
        ]
    );

    // Left mode on the same data only takes the first match
    let left_only = join(&left, &right, "name", JoinMode::Left);
    assert_eq!(left_only.len(), 1);
    assert_eq!(left_only.records[0].get("y"), Some("p"));
}

#[test]
fn test_unknown_merge_mode_is_noop() {
    let people = load(PEOPLE, "people");
    let departments = load(DEPARTMENTS, "departments");
    let result = merge(&people, &departments, "name", "outer");
    assert_eq!(result, people);
}
