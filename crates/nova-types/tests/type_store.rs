use nova_types::{
    format_type, ClassDef, ClassKind, FieldDef, MethodDef, Type, TypeEnv, TypeParamDef,
    TypeParamOwner, TypeStore,
};

use pretty_assertions::assert_eq;

#[test]
fn default_type_store_defines_java_lang_core() {
    let env = TypeStore::default();
    let wk = *env.well_known();

    // Implicit `java.lang.*` lookup for simple names.
    assert_eq!(env.lookup_class("Object"), Some(wk.object));
    assert_eq!(env.lookup_class("String"), Some(wk.string));
    assert_eq!(env.lookup_class("java.lang.Integer"), Some(wk.integer));
    assert_eq!(env.lookup_class("java.util.List"), None);
    assert_eq!(env.lookup_class("util.Object"), None);

    assert_eq!(env.direct_supertype(wk.object), None);
    assert_eq!(env.direct_supertype(wk.integer), Some(&Type::Class(wk.number)));
    assert_eq!(
        env.direct_superinterfaces(wk.string),
        &[Type::class(wk.comparable, vec![Type::Class(wk.string)])]
    );
}

#[test]
fn self_referential_bound_via_reserved_ids() {
    let mut env = TypeStore::with_minimal_jdk();
    let object = env.well_known().object;

    // class EnumLike<E extends EnumLike<E>>
    let enum_like = env.intern_class_id("com.example.EnumLike");
    let e = env.add_type_param("E", vec![Type::Class(object)]);
    env.define_type_param(
        e,
        TypeParamDef {
            name: "E".to_string(),
            owner: None,
            upper_bounds: vec![Type::class(enum_like, vec![Type::TypeVar(e)])],
        },
    );
    env.define_class(
        enum_like,
        ClassDef {
            name: "com.example.EnumLike".to_string(),
            type_params: vec![e],
            super_class: Some(Type::Class(object)),
            ..ClassDef::default()
        },
    );

    let tp = env.type_param(e).unwrap();
    assert_eq!(tp.owner, Some(TypeParamOwner::Class(enum_like)));
    assert_eq!(
        env.upper_bounds(&Type::TypeVar(e)),
        vec![Type::class(enum_like, vec![Type::TypeVar(e)])]
    );
    assert_eq!(
        format_type(&env, &tp.upper_bounds[0]),
        "com.example.EnumLike<E>"
    );
}

#[test]
fn nested_class_facts() {
    let mut env = TypeStore::with_minimal_jdk();
    let object = env.well_known().object;

    let t = env.add_type_param("T", vec![Type::Class(object)]);
    let outer = env.add_class(ClassDef {
        name: "com.example.Outer".to_string(),
        type_params: vec![t],
        super_class: Some(Type::Class(object)),
        ..ClassDef::default()
    });
    let inner = env.add_class(ClassDef {
        name: "com.example.Outer.Inner".to_string(),
        super_class: Some(Type::Class(object)),
        enclosing: Some(outer),
        fields: vec![FieldDef {
            name: "value".to_string(),
            ty: Type::TypeVar(t),
        }],
        methods: vec![MethodDef {
            name: "set".to_string(),
            type_params: vec![],
            params: vec![Type::TypeVar(t)],
            return_type: Type::Void,
        }],
        ..ClassDef::default()
    });

    assert_eq!(env.enclosing_type(inner), Some(outer));
    assert_eq!(env.enclosing_type(outer), None);
    assert!(env.declared_slots(inner).is_empty());
    assert_eq!(env.declared_slots(outer), &[t]);
    assert_eq!(env.field(inner, "value").unwrap().ty, Type::TypeVar(t));
    assert_eq!(
        env.class(inner).unwrap().method("set").unwrap().params,
        vec![Type::TypeVar(t)]
    );
    assert_eq!(env.class(inner).unwrap().kind, ClassKind::Class);
}

#[test]
fn type_store_clone_is_independent() {
    let mut store = TypeStore::with_minimal_jdk();
    let snapshot = store.clone();

    let foo = store.add_class(ClassDef {
        name: "com.example.Foo".to_string(),
        ..ClassDef::default()
    });

    assert!(store.class(foo).is_some());
    assert_eq!(snapshot.class_id("com.example.Foo"), None);
    assert_eq!(
        snapshot.class_id("java.util.List"),
        store.class_id("java.util.List")
    );
}
