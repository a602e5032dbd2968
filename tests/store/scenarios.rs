//! End-to-end path scenarios, run against every backend.

use crate::common::*;

#[test]
fn single_segment_put_get() {
    for s in each_backend() {
        s.put("foo", "bar").unwrap();
        assert_eq!(s.get("foo").unwrap(), Some(doc(json!("bar"))), "{}", s.name);
    }
}

#[test]
fn deep_put_builds_intermediate_maps() {
    for s in each_backend() {
        s.put("one.two.three.four", "content").unwrap();

        assert_eq!(
            s.get("one.two.three.four").unwrap(),
            Some(doc(json!("content"))),
            "{}",
            s.name
        );
        assert_eq!(
            s.get("one.two").unwrap(),
            Some(doc(json!({"three": {"four": "content"}}))),
            "{}",
            s.name
        );
        assert_eq!(
            s.get("one").unwrap(),
            Some(doc(json!({"two": {"three": {"four": "content"}}}))),
            "{}",
            s.name
        );
    }
}

#[test]
fn array_add_then_delete_element() {
    for s in each_backend() {
        s.put("an.array", Document::array()).unwrap();
        s.add("an.array", "one").unwrap();
        s.add("an.array", "two").unwrap();
        assert_eq!(
            s.get("an.array").unwrap(),
            Some(doc(json!(["one", "two"]))),
            "{}",
            s.name
        );

        s.delete("an.array.1").unwrap();
        assert_eq!(
            s.get("an.array").unwrap(),
            Some(doc(json!(["one"]))),
            "{}",
            s.name
        );
    }
}

#[test]
fn delete_leaf_then_whole_root() {
    for s in each_backend() {
        s.put("now.you.see.me", "x").unwrap();
        s.delete("now.you.see.me").unwrap();
        assert_eq!(s.get("now.you.see.me").unwrap(), None, "{}", s.name);

        s.put("now.you", Document::array()).unwrap();
        assert!(s.get("now.you").unwrap().is_some(), "{}", s.name);
        assert_eq!(s.get("now.you.see").unwrap(), None, "{}", s.name);

        s.delete("now").unwrap();
        assert_eq!(s.get("now").unwrap(), None, "{}", s.name);
        assert_eq!(s.get("now.you").unwrap(), None, "{}", s.name);
    }
}

#[test]
fn add_rejects_existing_non_array() {
    for s in each_backend() {
        s.put("user.tags", "not a list").unwrap();

        let err = s.add("user.tags", "x").unwrap_err();
        assert!(err.is_not_an_array(), "{}: {:?}", s.name, err);
        assert_eq!(
            s.get("user.tags").unwrap(),
            Some(doc(json!("not a list"))),
            "{}",
            s.name
        );
    }
}

#[test]
fn add_appends_to_root_record() {
    for s in each_backend() {
        s.add("events", json!({"n": 1})).unwrap();
        s.add("events", json!({"n": 2})).unwrap();
        assert_eq!(
            s.get("events").unwrap(),
            Some(doc(json!([{"n": 1}, {"n": 2}]))),
            "{}",
            s.name
        );
        assert_eq!(s.get("events.1.n").unwrap(), Some(doc(json!(2))), "{}", s.name);
    }
}

#[test]
fn delete_leaves_siblings_alone() {
    for s in each_backend() {
        s.put("cfg.db.host", "localhost").unwrap();
        s.put("cfg.db.port", 5432).unwrap();
        s.put("cfg.cache.ttl", 60).unwrap();

        s.delete("cfg.db.host").unwrap();
        assert_eq!(
            s.get("cfg").unwrap(),
            Some(doc(json!({"db": {"port": 5432}, "cache": {"ttl": 60}}))),
            "{}",
            s.name
        );
    }
}

#[test]
fn put_through_array_index() {
    for s in each_backend() {
        s.put("list", json!([{"a": 1}, {"a": 2}])).unwrap();
        s.put("list.1.a", 20).unwrap();
        s.put("list.2", "appended").unwrap();
        assert_eq!(
            s.get("list").unwrap(),
            Some(doc(json!([{"a": 1}, {"a": 20}, "appended"]))),
            "{}",
            s.name
        );
    }
}

#[test]
fn put_with_non_index_key_turns_array_into_map() {
    for s in each_backend() {
        s.put("list", json!(["a", "b"])).unwrap();
        s.put("list.name", "c").unwrap();
        assert_eq!(
            s.get("list").unwrap(),
            Some(doc(json!({"0": "a", "1": "b", "name": "c"}))),
            "{}",
            s.name
        );
    }
}

#[test]
fn put_replaces_scalar_in_the_way() {
    for s in each_backend() {
        s.put("r.a", 1).unwrap();
        s.put("r.a.b", 2).unwrap();
        assert_eq!(
            s.get("r").unwrap(),
            Some(doc(json!({"a": {"b": 2}}))),
            "{}",
            s.name
        );
    }
}

#[test]
fn null_is_stored_and_distinct_from_absent() {
    for s in each_backend() {
        s.put("n", Document::Null).unwrap();
        s.put("m.x", Document::Null).unwrap();
        assert_eq!(s.get("n").unwrap(), Some(Document::Null), "{}", s.name);
        assert_eq!(s.get("m.x").unwrap(), Some(Document::Null), "{}", s.name);
        assert_eq!(s.get("m.y").unwrap(), None, "{}", s.name);
    }
}

#[test]
fn root_segments_are_independent() {
    for s in each_backend() {
        s.put("a.x", 1).unwrap();
        s.put("b.x", 2).unwrap();
        s.delete("a").unwrap();
        assert_eq!(s.get("a.x").unwrap(), None, "{}", s.name);
        assert_eq!(s.get("b.x").unwrap(), Some(doc(json!(2))), "{}", s.name);
    }
}

#[test]
fn reserved_partition_records() {
    for s in each_backend() {
        s.put_record("job:1", json!({"state": "queued"})).unwrap();
        s.put_record("a.b.c", "dots are literal").unwrap();

        assert_eq!(
            s.get_record("job:1").unwrap(),
            Some(doc(json!({"state": "queued"}))),
            "{}",
            s.name
        );
        assert_eq!(
            s.get_record("a.b.c").unwrap(),
            Some(doc(json!("dots are literal"))),
            "{}",
            s.name
        );
        // path access does not see it
        assert_eq!(s.get("a.b.c").unwrap(), None, "{}", s.name);

        s.delete_record("job:1").unwrap();
        assert_eq!(s.get_record("job:1").unwrap(), None, "{}", s.name);
    }
}
