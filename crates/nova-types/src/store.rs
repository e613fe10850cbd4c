use std::collections::HashMap;

use crate::{
    ClassDef, ClassId, ClassKind, FieldDef, MethodDef, Type, TypeEnv, TypeParamDef,
    TypeParamOwner, TypeVarId,
};

/// Ids of the classes the engine needs to name directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellKnownTypes {
    /// `java.lang.Object`, the universal top type.
    pub object: ClassId,
    pub string: ClassId,
    pub integer: ClassId,
    pub number: ClassId,
    pub comparable: ClassId,
}

/// In-memory [`TypeEnv`].
///
/// Class ids can be reserved with [`TypeStore::intern_class_id`] before the class is defined,
/// which is how self-referential declarations (`E extends Enum<E>`) are built.
#[derive(Debug, Clone)]
pub struct TypeStore {
    classes: Vec<Option<ClassDef>>,
    class_names: HashMap<String, ClassId>,
    type_params: Vec<TypeParamDef>,
    well_known: WellKnownTypes,
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeStore {
    /// A store holding the `java.lang` core: `Object`, `Number`, `Integer`, `String` and
    /// `Comparable<T>`.
    pub fn new() -> Self {
        let placeholder = ClassId::from_raw(0);
        let mut store = Self {
            classes: Vec::new(),
            class_names: HashMap::new(),
            type_params: Vec::new(),
            well_known: WellKnownTypes {
                object: placeholder,
                string: placeholder,
                integer: placeholder,
                number: placeholder,
                comparable: placeholder,
            },
        };

        let object = store.add_class(ClassDef {
            name: "java.lang.Object".to_string(),
            ..ClassDef::default()
        });
        let object_ty = Type::Class(object);

        let comparable_t = store.add_type_param("T", vec![object_ty.clone()]);
        let comparable = store.add_class(ClassDef {
            name: "java.lang.Comparable".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![comparable_t],
            methods: vec![MethodDef {
                name: "compareTo".to_string(),
                type_params: vec![],
                params: vec![Type::TypeVar(comparable_t)],
                return_type: Type::Void,
            }],
            ..ClassDef::default()
        });

        let number = store.add_class(ClassDef {
            name: "java.lang.Number".to_string(),
            super_class: Some(object_ty.clone()),
            ..ClassDef::default()
        });

        let integer = store.intern_class_id("java.lang.Integer");
        store.define_class(
            integer,
            ClassDef {
                name: "java.lang.Integer".to_string(),
                super_class: Some(Type::Class(number)),
                interfaces: vec![Type::class(comparable, vec![Type::Class(integer)])],
                ..ClassDef::default()
            },
        );

        let string = store.intern_class_id("java.lang.String");
        store.define_class(
            string,
            ClassDef {
                name: "java.lang.String".to_string(),
                super_class: Some(object_ty),
                interfaces: vec![Type::class(comparable, vec![Type::Class(string)])],
                ..ClassDef::default()
            },
        );

        store.well_known = WellKnownTypes {
            object,
            string,
            integer,
            number,
            comparable,
        };
        store
    }

    /// [`TypeStore::new`] plus the `java.util` collection types most generic code touches:
    /// `Iterable<T>`, `Collection<E>`, `List<E>`, `ArrayList<E>`, `Map<K, V>` and `HashMap<K, V>`.
    pub fn with_minimal_jdk() -> Self {
        let mut store = Self::new();
        let object = Type::Class(store.well_known.object);

        let iterable_t = store.add_type_param("T", vec![object.clone()]);
        let iterable = store.add_class(ClassDef {
            name: "java.lang.Iterable".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![iterable_t],
            ..ClassDef::default()
        });

        let collection_e = store.add_type_param("E", vec![object.clone()]);
        let collection = store.add_class(ClassDef {
            name: "java.util.Collection".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![collection_e],
            interfaces: vec![Type::class(iterable, vec![Type::TypeVar(collection_e)])],
            ..ClassDef::default()
        });

        let list_e = store.add_type_param("E", vec![object.clone()]);
        let list = store.add_class(ClassDef {
            name: "java.util.List".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![list_e],
            interfaces: vec![Type::class(collection, vec![Type::TypeVar(list_e)])],
            methods: vec![
                MethodDef {
                    name: "getFirst".to_string(),
                    type_params: vec![],
                    params: vec![],
                    return_type: Type::TypeVar(list_e),
                },
                MethodDef {
                    name: "addFirst".to_string(),
                    type_params: vec![],
                    params: vec![Type::TypeVar(list_e)],
                    return_type: Type::Void,
                },
            ],
            ..ClassDef::default()
        });

        let array_list_e = store.add_type_param("E", vec![object.clone()]);
        store.add_class(ClassDef {
            name: "java.util.ArrayList".to_string(),
            type_params: vec![array_list_e],
            super_class: Some(object.clone()),
            interfaces: vec![Type::class(list, vec![Type::TypeVar(array_list_e)])],
            ..ClassDef::default()
        });

        let map_k = store.add_type_param("K", vec![object.clone()]);
        let map_v = store.add_type_param("V", vec![object.clone()]);
        let map = store.add_class(ClassDef {
            name: "java.util.Map".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![map_k, map_v],
            methods: vec![MethodDef {
                name: "get".to_string(),
                type_params: vec![],
                params: vec![object.clone()],
                return_type: Type::TypeVar(map_v),
            }],
            ..ClassDef::default()
        });

        let hash_map_k = store.add_type_param("K", vec![object.clone()]);
        let hash_map_v = store.add_type_param("V", vec![object.clone()]);
        store.add_class(ClassDef {
            name: "java.util.HashMap".to_string(),
            type_params: vec![hash_map_k, hash_map_v],
            super_class: Some(object),
            interfaces: vec![Type::class(
                map,
                vec![Type::TypeVar(hash_map_k), Type::TypeVar(hash_map_v)],
            )],
            ..ClassDef::default()
        });

        store
    }

    /// Reserve (or look up) the id for `name` without defining the class.
    pub fn intern_class_id(&mut self, name: &str) -> ClassId {
        if let Some(id) = self.class_names.get(name) {
            return *id;
        }
        let raw: u32 = self
            .classes
            .len()
            .try_into()
            .expect("too many classes in type store");
        let id = ClassId::from_raw(raw);
        self.classes.push(None);
        self.class_names.insert(name.to_string(), id);
        id
    }

    /// Define (or redefine) the class behind `id`.
    ///
    /// Type parameters of the class and of its methods get their owner attached here.
    pub fn define_class(&mut self, id: ClassId, def: ClassDef) {
        for tp in &def.type_params {
            if let Some(param) = self.type_params.get_mut(tp.index()) {
                param.owner = Some(TypeParamOwner::Class(id));
            }
        }
        for method in &def.methods {
            for tp in &method.type_params {
                if let Some(param) = self.type_params.get_mut(tp.index()) {
                    param.owner = Some(TypeParamOwner::Method {
                        class: id,
                        method: method.name.clone(),
                    });
                }
            }
        }

        self.class_names.insert(def.name.clone(), id);
        if let Some(slot) = self.classes.get_mut(id.index()) {
            *slot = Some(def);
        }
    }

    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        let id = self.intern_class_id(&def.name);
        self.define_class(id, def);
        id
    }

    pub fn add_type_param(&mut self, name: impl Into<String>, upper_bounds: Vec<Type>) -> TypeVarId {
        let raw: u32 = self
            .type_params
            .len()
            .try_into()
            .expect("too many type params in type store");
        self.type_params.push(TypeParamDef {
            name: name.into(),
            owner: None,
            upper_bounds,
        });
        TypeVarId::from_raw(raw)
    }

    /// Replace the definition of a previously added type parameter.
    ///
    /// An already attached owner is kept when `def.owner` is `None`.
    pub fn define_type_param(&mut self, id: TypeVarId, def: TypeParamDef) {
        let Some(slot) = self.type_params.get_mut(id.index()) else {
            return;
        };
        let owner = def.owner.or_else(|| slot.owner.take());
        *slot = TypeParamDef { owner, ..def };
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.class_names.get(name).copied()
    }

    pub fn is_defined(&self, id: ClassId) -> bool {
        matches!(self.classes.get(id.index()), Some(Some(_)))
    }

    /// Convenience lookup of a field declared directly on `class`.
    pub fn field(&self, class: ClassId, name: &str) -> Option<&FieldDef> {
        self.class(class).and_then(|def| def.field(name))
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.index()).and_then(Option::as_ref)
    }

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.type_params.get(id.index())
    }

    /// Exact binary-name lookup, falling back to the implicit `java.lang.*` import for simple
    /// names.
    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        if let Some(id) = self.class_id(name) {
            return Some(id);
        }
        if name.contains('.') {
            return None;
        }
        self.class_id(&format!("java.lang.{name}"))
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }
}
