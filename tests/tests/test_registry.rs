// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::any::{Any, TypeId};
use std::sync::{Arc, Barrier};
use std::thread;

use archivist::{
    registry, Archive, Archivist, Error, FieldType, FieldsBuilder, ReadContext, Record,
    RecordInfo, RecordType, ScalarKind, TypeDescriptor, WriteContext,
};
use archivist_core::serializer::record;

/// A hand-written record with one `i32` field `x` and a custom declaration.
macro_rules! hand_written {
    ($ty:ident, $name:expr, $version:expr, $min:expr, |$fields:ident| $body:block) => {
        #[derive(Default, Debug)]
        struct $ty {
            x: i32,
        }

        impl RecordType for $ty {
            const TYPE_NAME: &'static str = $name;
            const VERSION: u32 = $version;
            const MIN_VERSION: u32 = $min;

            fn declare_fields($fields: &mut FieldsBuilder) -> Result<(), Error> $body
        }

        impl Record for $ty {
            fn record_info(&self) -> Result<Arc<RecordInfo>, Error> {
                registry().record_info::<Self>()
            }

            fn record_type_name(&self) -> &'static str {
                Self::TYPE_NAME
            }

            fn field_ref(&self, name: &str) -> Option<&dyn Any> {
                (name == "x").then_some(&self.x as &dyn Any)
            }

            fn field_mut(&mut self, name: &str) -> Option<&mut dyn Any> {
                if name == "x" {
                    Some(&mut self.x as &mut dyn Any)
                } else {
                    None
                }
            }

            fn boxed_default(&self) -> Box<dyn Record> {
                Box::new(Self::default())
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }
        }

        impl Archive for $ty {
            fn field_type() -> FieldType {
                FieldType::Record(Self::TYPE_NAME)
            }

            fn write_value(&self, context: &mut WriteContext) -> Result<(), Error> {
                record::write(self, context)
            }

            fn read_value(context: &mut ReadContext<'_>, text: &str) -> Result<Self, Error> {
                record::read(context, text)
            }

            fn archive_eq(&self, other: &Self) -> bool {
                record::equals(self, other)
            }

            fn deep_copy(&self) -> Self {
                record::deep_copy(self)
            }
        }
    };
}

hand_written!(Manual, "Manual", 0, 0, |fields| {
    fields.field::<i32>("x")?;
    Ok(())
});

hand_written!(Twice, "Twice", 0, 0, |fields| {
    fields.field::<i32>("x")?.field::<i64>("x")?;
    Ok(())
});

hand_written!(Spaced, "has space", 0, 0, |fields| {
    fields.field::<i32>("x")?;
    Ok(())
});

hand_written!(Shadow, "i32", 0, 0, |fields| {
    fields.field::<i32>("x")?;
    Ok(())
});

hand_written!(Backwards, "Backwards", 1, 2, |fields| {
    fields.field::<i32>("x")?;
    Ok(())
});

hand_written!(BadField, "BadField", 0, 0, |fields| {
    fields.field::<i32>("two words")?;
    Ok(())
});

hand_written!(Ouroboros, "Ouroboros", 0, 0, |fields| {
    fields.inherit::<Ouroboros>()?;
    Ok(())
});

#[test]
fn test_hand_written_record() {
    let archivist = Archivist::default();
    let text = archivist.serialize(&Manual { x: 3 }).unwrap();
    assert_eq!(text, "Manual {\n    x=3\n}\n");
    let back: Manual = archivist.deserialize(&text).unwrap();
    assert_eq!(back.x, 3);
}

#[test]
fn test_duplicate_field_registration() {
    let err = registry().register::<Twice>().unwrap_err();
    match err {
        Error::DuplicateFieldRegistration { type_name, field } => {
            assert_eq!(type_name, "Twice");
            assert_eq!(field, "x");
        }
        other => panic!("unexpected error: {other}"),
    }
    // Every later use fails the same way.
    let err = Archivist::default().serialize(&Twice { x: 1 }).unwrap_err();
    assert!(matches!(err, Error::DuplicateFieldRegistration { .. }));
    assert!(!registry().is_registered("Twice"));
}

#[test]
#[should_panic(expected = "field `x` is registered twice for type `Twice`")]
fn test_copy_of_unregistrable_record_panics() {
    let _ = archivist::deep_copy(&Twice { x: 5 });
}

#[test]
#[should_panic(expected = "field `x` is registered twice for type `Twice`")]
fn test_equality_of_unregistrable_record_panics() {
    let _ = archivist::deep_equal(&Twice { x: 5 }, &Twice { x: 5 });
}

#[test]
fn test_invalid_declarations() {
    for err in [
        registry().register::<Spaced>().unwrap_err(),
        registry().register::<Shadow>().unwrap_err(),
        registry().register::<Backwards>().unwrap_err(),
        registry().register::<BadField>().unwrap_err(),
        registry().register::<Ouroboros>().unwrap_err(),
    ] {
        assert!(matches!(err, Error::InvalidType(_)), "{err}");
        assert_eq!(err.line(), None);
    }
}

#[derive(Archive, Default, Debug, PartialEq)]
struct Creature {
    id: i32,
    name: String,
    speed: f32,
}

#[derive(Archive, Default, Debug, PartialEq)]
struct Dragon {
    #[archive(parent)]
    base: Creature,
    name: i64,
    wings: u8,
}

#[derive(Archive, Default, Debug, PartialEq)]
struct Wyrm {
    #[archive(parent)]
    dragon: Dragon,
    venom: bool,
}

#[test]
fn test_inherited_fields() {
    let info = registry().register::<Dragon>().unwrap();
    let names: Vec<_> = info.bindings().iter().map(|b| b.name()).collect();
    assert_eq!(names, vec!["id", "name", "speed", "wings"]);
    assert_eq!(info.binding("id").unwrap().declared_in(), "Creature");
    assert_eq!(info.binding("name").unwrap().declared_in(), "Dragon");
    assert_eq!(
        info.binding("name").unwrap().field_type(),
        &FieldType::Scalar(ScalarKind::I64)
    );
    assert_eq!(info.ancestors(), &["Creature"]);

    let dragon = Dragon {
        base: Creature {
            id: 1,
            name: String::new(),
            speed: 2.5,
        },
        name: 5,
        wings: 2,
    };
    let archivist = Archivist::default();
    let text = archivist.serialize(&dragon).unwrap();
    assert_eq!(
        text,
        "Dragon {\n    id=1\n    name=5\n    speed=2.5\n    wings=2\n}\n"
    );
    assert_eq!(archivist.deserialize::<Dragon>(&text).unwrap(), dragon);
}

#[test]
fn test_ancestor_chain() {
    let wyrm = registry().register::<Wyrm>().unwrap();
    let creature = registry().register::<Creature>().unwrap();
    assert_eq!(wyrm.ancestors(), &["Dragon", "Creature"]);
    assert!(wyrm.is_related_to(&creature));
    assert!(creature.is_related_to(&wyrm));
    assert_eq!(wyrm.bindings().len(), 5);

    let manual = registry().register::<Manual>().unwrap();
    assert!(!manual.is_related_to(&creature));
}

#[derive(Archive, Default, Debug, PartialEq)]
struct Cache {
    #[archive(rename = "key-name")]
    key: String,
    #[archive(skip)]
    hits: u64,
    r#type: u8,
}

#[test]
fn test_renamed_and_skipped_fields() {
    let archivist = Archivist::default();
    let cache = Cache {
        key: "k".to_string(),
        hits: 99,
        r#type: 2,
    };
    let text = archivist.serialize(&cache).unwrap();
    assert_eq!(text, "Cache {\n    key-name=\"k\"\n    type=2\n}\n");
    let back: Cache = archivist.deserialize(&text).unwrap();
    assert_eq!(back.key, "k");
    assert_eq!(back.hits, 0);
    assert_eq!(back.r#type, 2);
}

#[derive(Archive, Default, Debug)]
#[archive(name = "Twin")]
struct FirstTwin {
    a: i32,
}

#[derive(Archive, Default, Debug)]
#[archive(name = "Twin")]
struct SecondTwin {
    b: i32,
}

#[test]
fn test_name_collision_keeps_first_registration() {
    let first = registry().register::<FirstTwin>().unwrap();
    let second = registry().register::<SecondTwin>().unwrap();
    assert_eq!(first.type_name(), second.type_name());
    let by_name = registry().record_by_name("Twin").unwrap();
    assert_eq!(by_name.rust_type(), TypeId::of::<FirstTwin>());
    assert_eq!(second.rust_type(), TypeId::of::<SecondTwin>());
}

#[derive(Archive, Default, Debug, PartialEq)]
struct Marker {
    label: String,
}

#[test]
fn test_resolve_names() {
    registry().register::<Marker>().unwrap();
    assert!(registry().is_registered("Marker"));

    assert!(matches!(
        registry().resolve("Marker", 1).unwrap(),
        TypeDescriptor::Record(info) if info.type_name() == "Marker"
    ));
    match registry().resolve("i32[][]", 1).unwrap() {
        TypeDescriptor::Array(inner) => assert!(matches!(
            *inner,
            TypeDescriptor::Array(ref component)
                if matches!(**component, TypeDescriptor::Builtin(FieldType::Scalar(ScalarKind::I32)))
        )),
        other => panic!("unexpected descriptor: {other:?}"),
    }
    match registry().resolve("HashMap<String,Vec<Marker>>", 1).unwrap() {
        TypeDescriptor::Generic { name, arguments } => {
            assert_eq!(name, "HashMap");
            assert_eq!(arguments.len(), 2);
        }
        other => panic!("unexpected descriptor: {other:?}"),
    }
    assert!(registry().lookup("Vec<i32,i32>").is_none());
    assert!(registry().lookup("Marker[]").is_some());

    let err = registry().resolve("Phantom", 7).unwrap_err();
    assert!(matches!(err, Error::TypeNotFound { line: 7, .. }));
    assert_eq!(err.line(), Some(7));
}

#[derive(Archive, Default, Debug)]
struct Contended {
    first: i32,
    second: Vec<String>,
}

#[test]
fn test_concurrent_first_use() {
    const THREADS: usize = 8;
    let barrier = Barrier::new(THREADS);
    let infos: Vec<Arc<RecordInfo>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    registry().record_info::<Contended>().unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for info in &infos {
        assert!(Arc::ptr_eq(info, &infos[0]));
        assert_eq!(info.bindings().len(), 2);
    }
}
