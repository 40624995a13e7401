//! Call and construct signatures, overload selection and inference.

use smallvec::SmallVec;
use tsq_syntax::{NodeFlags, NodeIndex, SyntaxKind};

use super::TypeChecker;
use crate::symbols::{DeclRef, FileId, SymbolFlags, SymbolId};
use crate::types::{Parameter, Signature, SignatureKind, TypeId, TypeKind, TypeMapper};

const MAX_INFERENCE_DEPTH: u32 = 8;

/// Overload resolution result for a call or `new` expression.
#[derive(Debug, Clone)]
pub struct ResolvedCall {
    /// Every signature of the callee, in declaration order.
    pub candidates: Vec<Signature>,
    /// Index of the candidate the arguments select.
    pub selected: usize,
    /// Type arguments, explicit or inferred, of the selected candidate.
    pub mapper: TypeMapper,
}

impl ResolvedCall {
    /// The selected candidate with its type arguments applied.
    pub fn signature(&self, checker: &TypeChecker<'_>) -> Signature {
        let signature = &self.candidates[self.selected];
        checker.instantiate_signature(signature, &self.mapper)
    }
}

impl<'p> TypeChecker<'p> {
    // =========================================================================
    // Signatures of types
    // =========================================================================

    pub fn signatures_of_type(&self, ty: TypeId, kind: SignatureKind) -> Vec<Signature> {
        self.signatures_of_type_at_depth(ty, kind, 0)
    }

    fn signatures_of_type_at_depth(
        &self,
        ty: TypeId,
        kind: SignatureKind,
        depth: u32,
    ) -> Vec<Signature> {
        if depth > MAX_INFERENCE_DEPTH {
            return Vec::new();
        }
        let resolved = self.resolve_type(ty);
        let shape = self.types().get(resolved);
        match &*shape {
            TypeKind::Anonymous { symbol, mapper } => {
                let owner = self.symbol(*symbol);
                let signatures = if owner.has(SymbolFlags::CLASS) {
                    if kind == SignatureKind::Construct {
                        self.class_construct_signatures(*symbol)
                    } else {
                        Vec::new()
                    }
                } else if owner.has(SymbolFlags::FUNCTION | SymbolFlags::METHOD) {
                    self.declared_signatures(&owner.declarations, kind)
                } else if owner.has(SymbolFlags::TYPE_LITERAL) {
                    let mut signatures = self.declared_signatures(&owner.declarations, kind);
                    let member = match kind {
                        SignatureKind::Call => "__call",
                        SignatureKind::Construct => "__new",
                    };
                    if let Some(&member) = owner.members.get(member) {
                        signatures.extend(
                            self.declared_signatures(&self.symbol(member).declarations, kind),
                        );
                    }
                    signatures
                } else {
                    Vec::new()
                };
                signatures
                    .iter()
                    .map(|s| self.instantiate_signature(s, mapper))
                    .collect()
            }
            TypeKind::Reference { target, args } => {
                let owner = self.symbol(*target);
                if !owner.has(SymbolFlags::CLASS | SymbolFlags::INTERFACE) {
                    return Vec::new();
                }
                let member = match kind {
                    SignatureKind::Call => "__call",
                    SignatureKind::Construct => "__new",
                };
                let mapper = self.mapper_for_reference(*target, args);
                let own: Vec<Signature> = owner
                    .members
                    .get(member)
                    .map(|&m| self.declared_signatures(&self.symbol(m).declarations, kind))
                    .unwrap_or_default()
                    .iter()
                    .map(|s| self.instantiate_signature(s, &mapper))
                    .collect();
                if !own.is_empty() {
                    return own;
                }
                self.base_types(*target, args)
                    .into_iter()
                    .flat_map(|b| self.signatures_of_type_at_depth(b, kind, depth + 1))
                    .collect()
            }
            TypeKind::Union(members) => members
                .iter()
                .map(|&m| self.signatures_of_type_at_depth(m, kind, depth + 1))
                .find(|s| !s.is_empty())
                .unwrap_or_default(),
            TypeKind::Intersection(members) => members
                .iter()
                .flat_map(|&m| self.signatures_of_type_at_depth(m, kind, depth + 1))
                .collect(),
            TypeKind::TypeParameter(parameter) => self
                .type_parameter_constraint(*parameter)
                .map(|c| self.signatures_of_type_at_depth(c, kind, depth + 1))
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Signatures of function-like declarations. When a symbol has bodiless
    /// overloads, the implementation signature is hidden.
    pub(crate) fn declared_signatures(
        &self,
        declarations: &[DeclRef],
        kind: SignatureKind,
    ) -> Vec<Signature> {
        let function_like: SmallVec<[DeclRef; 4]> = declarations
            .iter()
            .copied()
            .filter(|d| {
                self.arena(d.file).is_some_and(|a| {
                    let k = a.kind(d.node);
                    k.is_function_like() && signature_kind_of(k) == kind
                })
            })
            .collect();
        let has_body = |d: &DeclRef| {
            self.arena(d.file)
                .is_some_and(|a| a.body(d.node).is_some())
        };
        let has_overloads =
            function_like.len() > 1 && function_like.iter().any(|d| !has_body(d));
        function_like
            .iter()
            .filter(|d| !has_overloads || !has_body(d))
            .map(|d| self.signature_from_declaration(d.file, d.node))
            .collect()
    }

    /// Signature declared by a function-like node.
    pub fn signature_from_declaration(&self, file: FileId, node: NodeIndex) -> Signature {
        let declaration = Some(DeclRef::new(file, node));
        let (Some(arena), Some(source)) = (self.arena(file), self.source(file)) else {
            return Signature {
                declaration,
                kind: SignatureKind::Call,
                type_parameters: Vec::new(),
                parameters: Vec::new(),
                return_type: TypeId::ANY,
            };
        };
        let kind = arena.kind(node);
        let class = (kind == SyntaxKind::Constructor).then(|| arena.parent(node));
        let type_parameters = match class {
            Some(class) => self.type_parameters_of_declaration(file, class),
            None => self.type_parameters_of_declaration(file, node),
        };
        let parameters = arena
            .parameters(node)
            .iter()
            .filter(|&&p| {
                let name = arena.name(p);
                !(arena.kind(name) == SyntaxKind::Identifier && arena.text(name) == "this")
            })
            .map(|&p| {
                let flags = arena.flags(p);
                Parameter {
                    name: source.node_text(arena.name(p)).to_string(),
                    ty: self.type_of_declaration(file, p),
                    optional: flags.contains(NodeFlags::OPTIONAL) || arena.initializer(p).is_some(),
                    rest: flags.contains(NodeFlags::REST),
                    declaration: Some(DeclRef::new(file, p)),
                }
            })
            .collect();
        let return_type = match class {
            Some(class) => self
                .declaration_symbol(file, class)
                .map_or(TypeId::ANY, |c| self.declared_type_of_symbol(c)),
            None => self.return_type_of_declaration(file, node),
        };
        Signature {
            declaration,
            kind: signature_kind_of(kind),
            type_parameters,
            parameters,
            return_type,
        }
    }

    /// `new` signatures of a class: its constructors, else the base class
    /// constructors returning this class, else an empty `new ()`.
    fn class_construct_signatures(&self, class: SymbolId) -> Vec<Signature> {
        let symbol = self.symbol(class);
        let instance = self.declared_type_of_symbol(class);
        let type_parameters = self.type_parameters_of_symbol(class);
        if let Some(&constructor) = symbol.members.get("__constructor") {
            let signatures = self
                .declared_signatures(&self.symbol(constructor).declarations, SignatureKind::Construct);
            if !signatures.is_empty() {
                return signatures;
            }
        }
        if let Some(base) = self.base_constructor_type(class) {
            let inherited = self.signatures_of_type(base, SignatureKind::Construct);
            if !inherited.is_empty() {
                return inherited
                    .into_iter()
                    .map(|s| Signature {
                        type_parameters: type_parameters.clone(),
                        return_type: instance,
                        ..s
                    })
                    .collect();
            }
        }
        vec![Signature {
            declaration: symbol.first_declaration(),
            kind: SignatureKind::Construct,
            type_parameters,
            parameters: Vec::new(),
            return_type: instance,
        }]
    }

    pub fn instantiate_signature(
        &self,
        signature: &Signature,
        mapper: &[(SymbolId, TypeId)],
    ) -> Signature {
        if mapper.is_empty() {
            return signature.clone();
        }
        Signature {
            declaration: signature.declaration,
            kind: signature.kind,
            type_parameters: signature
                .type_parameters
                .iter()
                .copied()
                .filter(|p| !mapper.iter().any(|(q, _)| q == p))
                .collect(),
            parameters: signature
                .parameters
                .iter()
                .map(|p| Parameter {
                    ty: self.instantiate(p.ty, mapper),
                    ..p.clone()
                })
                .collect(),
            return_type: self.instantiate(signature.return_type, mapper),
        }
    }

    /// Type of the parameter receiving argument `index`, spreading rest
    /// parameters.
    pub fn parameter_type_at(&self, signature: &Signature, index: usize) -> Option<TypeId> {
        match signature.parameters.get(index) {
            Some(p) if p.rest => Some(self.element_type_of(p.ty)),
            Some(p) => Some(p.ty),
            None => signature
                .parameters
                .last()
                .filter(|p| p.rest)
                .map(|p| self.element_type_of(p.ty)),
        }
    }

    // =========================================================================
    // Calls
    // =========================================================================

    /// Signatures a call or `new` expression can invoke, without inferring
    /// type arguments.
    pub fn call_candidates(&self, file: FileId, call: NodeIndex) -> Vec<Signature> {
        let Some(arena) = self.arena(file) else {
            return Vec::new();
        };
        let callee = arena.expression(call);
        if arena.kind(call) == SyntaxKind::NewExpression {
            let ty = self.type_of_expression(file, callee);
            return self.signatures_of_type(ty, SignatureKind::Construct);
        }
        if arena.kind(callee) == SyntaxKind::SuperKeyword {
            let class = arena.find_ancestor(callee, |k| k.is_class_like());
            return self
                .declaration_symbol(file, class)
                .and_then(|c| self.base_constructor_type(c))
                .map(|b| self.signatures_of_type(b, SignatureKind::Construct))
                .unwrap_or_default();
        }
        let ty = self.type_of_expression(file, callee);
        self.signatures_of_type(ty, SignatureKind::Call)
    }

    /// Choose the overload for a call and compute its type arguments.
    pub fn resolve_call(&self, file: FileId, call: NodeIndex) -> Option<ResolvedCall> {
        let arena = self.arena(file)?;
        let candidates = self.call_candidates(file, call);
        if candidates.is_empty() {
            return None;
        }
        let arguments = arena.arguments(call);
        let selected = candidates
            .iter()
            .position(|s| {
                s.accepts_argument_count(arguments.len())
                    && self.arguments_match(file, s, arguments)
            })
            .or_else(|| {
                candidates
                    .iter()
                    .position(|s| s.accepts_argument_count(arguments.len()))
            })
            .unwrap_or(0);
        let signature = &candidates[selected];
        let mapper = if signature.type_parameters.is_empty() {
            TypeMapper::new()
        } else {
            let explicit = arena.type_arguments(call);
            if explicit.is_empty() {
                self.infer_type_arguments(file, signature, arguments)
            } else {
                signature
                    .type_parameters
                    .iter()
                    .zip(explicit)
                    .map(|(&p, &a)| (p, self.type_from_type_node(file, a)))
                    .collect()
            }
        };
        Some(ResolvedCall {
            candidates,
            selected,
            mapper,
        })
    }

    /// Whether each argument relates to its parameter. Function expressions
    /// take their types from the parameter and are not compared.
    fn arguments_match(&self, file: FileId, signature: &Signature, arguments: &[NodeIndex]) -> bool {
        let Some(arena) = self.arena(file) else {
            return true;
        };
        arguments.iter().enumerate().all(|(index, &argument)| {
            if matches!(
                arena.kind(argument),
                SyntaxKind::ArrowFunction | SyntaxKind::FunctionExpression
            ) {
                return true;
            }
            let Some(parameter) = self.parameter_type_at(signature, index) else {
                return true;
            };
            let argument = self.type_of_expression(file, argument);
            self.is_type_assignable_to(argument, parameter)
        })
    }

    fn infer_type_arguments(
        &self,
        file: FileId,
        signature: &Signature,
        arguments: &[NodeIndex],
    ) -> TypeMapper {
        let types = self.types();
        let mut candidates: Vec<(SymbolId, Vec<TypeId>)> = signature
            .type_parameters
            .iter()
            .map(|&p| (p, Vec::new()))
            .collect();
        for (index, &argument) in arguments.iter().enumerate() {
            let Some(parameter) = self.parameter_type_at(signature, index) else {
                break;
            };
            let argument = self.type_of_expression(file, argument);
            self.infer_from(parameter, argument, &mut candidates, 0);
        }
        candidates
            .into_iter()
            .map(|(parameter, inferred)| {
                let ty = if inferred.is_empty() {
                    self.type_parameter_default(parameter)
                        .unwrap_or(TypeId::UNKNOWN)
                } else {
                    types.widen(types.union(inferred))
                };
                (parameter, ty)
            })
            .collect()
    }

    fn infer_from(
        &self,
        parameter: TypeId,
        argument: TypeId,
        candidates: &mut Vec<(SymbolId, Vec<TypeId>)>,
        depth: u32,
    ) {
        if depth > MAX_INFERENCE_DEPTH || argument == TypeId::ANY {
            return;
        }
        let types = self.types();
        let parameter_shape = types.get(parameter);
        let argument = self.resolve_type(argument);
        let argument_shape = types.get(argument);
        match (&*parameter_shape, &*argument_shape) {
            (TypeKind::TypeParameter(p), _) => {
                if let Some((_, inferred)) = candidates.iter_mut().find(|(q, _)| q == p)
                    && !inferred.contains(&argument)
                {
                    inferred.push(argument);
                }
            }
            (TypeKind::Array(p), TypeKind::Array(a)) => {
                self.infer_from(*p, *a, candidates, depth + 1)
            }
            (TypeKind::Array(p), TypeKind::Tuple(elements)) => {
                let element = types.union(elements.iter().map(|e| e.ty));
                self.infer_from(*p, element, candidates, depth + 1)
            }
            (TypeKind::Union(members), _) => {
                let argument = types.non_nullable(argument);
                for &member in members.iter() {
                    if matches!(&*types.get(member), TypeKind::TypeParameter(_)) {
                        self.infer_from(member, argument, candidates, depth + 1);
                    }
                }
            }
            (
                TypeKind::Reference { target: p, args: pa },
                TypeKind::Reference { target: a, args: aa },
            ) if p == a => {
                for (&p, &a) in pa.iter().zip(aa.iter()) {
                    self.infer_from(p, a, candidates, depth + 1);
                }
            }
            (TypeKind::Anonymous { .. }, _) => {
                let parameter_signatures = self.signatures_of_type(parameter, SignatureKind::Call);
                let argument_signatures = self.signatures_of_type(argument, SignatureKind::Call);
                if let (Some(p), Some(a)) =
                    (parameter_signatures.first(), argument_signatures.first())
                {
                    self.infer_from(p.return_type, a.return_type, candidates, depth + 1);
                    return;
                }
                for property in self.properties_of_type(parameter) {
                    let name = self.symbol_name(property.symbol);
                    if let Some(other) = self.property_of_type(argument, name) {
                        self.infer_from(
                            self.type_of_property(property),
                            self.type_of_property(other),
                            candidates,
                            depth + 1,
                        );
                    }
                }
            }
            _ => {}
        }
    }

    /// Result type of a call or `new` expression.
    pub fn return_type_of_call(&self, file: FileId, call: NodeIndex) -> TypeId {
        match self.resolve_call(file, call) {
            Some(resolved) => resolved.signature(self).return_type,
            None => TypeId::ANY,
        }
    }
}

fn signature_kind_of(kind: SyntaxKind) -> SignatureKind {
    match kind {
        SyntaxKind::Constructor | SyntaxKind::ConstructSignature | SyntaxKind::ConstructorType => {
            SignatureKind::Construct
        }
        _ => SignatureKind::Call,
    }
}
