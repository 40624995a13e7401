use super::*;

#[test]
fn test_intrinsics_have_fixed_ids() {
    let interner = TypeInterner::new();
    assert_eq!(interner.intern(TypeKind::Intrinsic(Intrinsic::String)), TypeId::STRING);
    assert_eq!(interner.boolean_literal(true), TypeId::TRUE);
    assert_eq!(*interner.get(TypeId::NUMBER), TypeKind::Intrinsic(Intrinsic::Number));
}

#[test]
fn test_structural_interning_reuses_ids() {
    let interner = TypeInterner::new();
    let a = interner.array(TypeId::STRING);
    let b = interner.array(TypeId::STRING);
    assert_eq!(a, b);
    assert_ne!(a, interner.array(TypeId::NUMBER));
    assert_eq!(interner.string_literal("x"), interner.string_literal("x"));
}

#[test]
fn test_union_normalization() {
    let interner = TypeInterner::new();
    let a = interner.string_literal("a");
    let b = interner.string_literal("b");
    let ab = interner.union([a, b]);
    assert_eq!(interner.union([b, ab, a]), interner.union([a, b]));
    assert_eq!(interner.union([a, TypeId::STRING]), TypeId::STRING);
    assert_eq!(interner.union([TypeId::TRUE, TypeId::FALSE]), TypeId::BOOLEAN);
    assert_eq!(interner.union([a, TypeId::NEVER]), a);
    assert_eq!(interner.union([a, TypeId::ANY]), TypeId::ANY);
    assert_eq!(interner.union(Vec::new()), TypeId::NEVER);
}

#[test]
fn test_boolean_collapses_into_canonical_union() {
    let interner = TypeInterner::new();
    let u = interner.union([TypeId::STRING, TypeId::TRUE, TypeId::NUMBER, TypeId::FALSE]);
    assert_eq!(
        interner.union_members(u),
        vec![TypeId::STRING, TypeId::NUMBER, TypeId::BOOLEAN]
    );
    assert_eq!(interner.union([TypeId::BOOLEAN, TypeId::NUMBER, TypeId::STRING]), u);
}

#[test]
fn test_union_id_ignores_member_order() {
    let interner = TypeInterner::new();
    let a = interner.string_literal("a");
    let b = interner.string_literal("b");
    let one = interner.number_literal("1");
    let forward = interner.union([a, b, one]);
    let backward = interner.union([one, b, a]);
    assert_eq!(forward, backward);
    assert_eq!(interner.union_members(backward), vec![a, b, one]);
}

#[test]
fn test_widen_and_non_nullable() {
    let interner = TypeInterner::new();
    let one = interner.number_literal("1");
    assert_eq!(interner.widen(one), TypeId::NUMBER);
    let maybe = interner.union([TypeId::STRING, TypeId::UNDEFINED, TypeId::NULL]);
    assert_eq!(interner.non_nullable(maybe), TypeId::STRING);
}

#[test]
fn test_canonical_number() {
    assert_eq!(canonical_number("0x10"), "16");
    assert_eq!(canonical_number("1_000"), "1000");
    assert_eq!(canonical_number("1.50"), "1.5");
    assert_eq!(canonical_number("2.0"), "2");
}

#[test]
fn test_signature_arity() {
    let signature = Signature {
        declaration: None,
        kind: SignatureKind::Call,
        type_parameters: Vec::new(),
        parameters: vec![
            Parameter {
                name: "a".into(),
                ty: TypeId::NUMBER,
                optional: false,
                rest: false,
                declaration: None,
            },
            Parameter {
                name: "b".into(),
                ty: TypeId::STRING,
                optional: true,
                rest: false,
                declaration: None,
            },
        ],
        return_type: TypeId::VOID,
    };
    assert_eq!(signature.min_argument_count(), 1);
    assert!(signature.accepts_argument_count(2));
    assert!(!signature.accepts_argument_count(3));
    assert!(!signature.accepts_argument_count(0));
}
