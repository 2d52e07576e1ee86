#![allow(clippy::unwrap_used)]

use dbrepo_ir::{
    Address, Attr, CompositeDecl, CompositeKind, Declaration, EnumDecl, Enumerator, FieldDecl,
    FunDecl, IntKind, LocalDecl, LocationDesc, Name, ParamDecl, ProtoDecl, ScopeId, SourceLoc,
    Stamp, StorageClass, StringInterner, SymbolId, TypeExpr, TypedefDecl, VarDecl,
};
use pretty_assertions::assert_eq;

use super::*;
use crate::config::{DebugLevel, TypeKeyMode};
use crate::defs::Definition;
use crate::ranges::{LiveRange, ScopeRange, VarLocation};
use crate::types::{BitfieldLayout, TypeDescriptor};

struct Fixture {
    repo: DebugRepository,
    names: StringInterner,
    file: Name,
}

impl Fixture {
    fn new(config: RepoConfig) -> Self {
        let mut names = StringInterner::new();
        let file = names.intern("main.c");
        let mut repo = DebugRepository::new(config);
        repo.init("main.c");
        Self { repo, names, file }
    }

    fn name(&mut self, s: &str) -> Name {
        self.names.intern(s)
    }

    fn loc(&self, line: u32) -> SourceLoc {
        SourceLoc::new(self.file, line, 1)
    }

    fn var(&mut self, name: &str, stamp: u32, storage: StorageClass, has_init: bool) -> VarDecl {
        VarDecl {
            name: self.name(name),
            stamp: Stamp::new(stamp),
            storage,
            ty: TypeExpr::int(IntKind::Int),
            has_init,
            loc: self.loc(1),
        }
    }

    fn fun(&mut self, name: &str, stamp: u32, params: Vec<ParamDecl>) -> FunDecl {
        FunDecl {
            name: self.name(name),
            stamp: Stamp::new(stamp),
            storage: StorageClass::Default,
            ret: TypeExpr::int(IntKind::Int),
            params,
            variadic: false,
            loc: self.loc(10),
        }
    }

    fn local(&mut self, name: &str, stamp: u32, storage: StorageClass) -> LocalDecl {
        LocalDecl {
            name: self.name(name),
            stamp: Stamp::new(stamp),
            storage,
            ty: TypeExpr::int(IntKind::Long),
            loc: self.loc(12),
        }
    }
}

fn full() -> Fixture {
    Fixture::new(RepoConfig::default())
}

fn a(n: u64) -> Address {
    Address::new(n)
}

// -- Lifecycle --

#[test]
fn init_resets_ids_and_tables() {
    let mut fx = full();
    let decl = fx.var("g", 1, StorageClass::Default, true);
    fx.repo.insert_global_variable(&decl).unwrap();
    fx.repo.add_compilation_section_start(fx.file, a(0));
    assert!(fx.repo.definitions().count() > 0);

    fx.repo.init("other.c");

    assert_eq!(fx.repo.unit_name(), "other.c");
    assert_eq!(fx.repo.definitions().count(), 0);
    assert_eq!(fx.repo.types().count(), 0);
    assert_eq!(fx.repo.files().count(), 0);
    assert!(!fx.repo.section_exists(fx.file));
    assert_eq!(fx.repo.next_id(), DebugId::from_raw(0));
}

#[test]
fn ids_are_unique_across_tables() {
    let mut fx = full();
    let decl = fx.var("g", 1, StorageClass::Default, true);
    let def = fx.repo.insert_global_variable(&decl).unwrap();
    let ty = fx.repo.intern_type(&TypeExpr::int(IntKind::Int));
    let local = fx.local("x", 5, StorageClass::Auto);
    let var = fx.repo.insert_local_variable(&local).unwrap();
    let loose = fx.repo.next_id();

    let mut all = vec![def, ty, var, loose];
    all.sort();
    all.dedup();
    assert_eq!(all.len(), 4);
}

// -- Global declarations --

#[test]
fn tentative_global_completed_in_place() {
    let mut fx = full();
    let tentative = fx.var("counter", 1, StorageClass::Extern, false);
    let defining = fx.var("counter", 1, StorageClass::Default, true);

    let first = fx.repo.insert_global_variable(&tentative).unwrap();
    let is_tentative = |repo: &DebugRepository| {
        repo.definition(first)
            .and_then(Definition::as_variable)
            .map(|v| v.is_tentative)
    };
    assert_eq!(is_tentative(&fx.repo), Some(true));

    let second = fx
        .repo
        .insert_global_declaration(&Declaration::Variable(defining))
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(is_tentative(&fx.repo), Some(false));
}

#[test]
fn static_global_is_not_external() {
    let mut fx = full();
    let decl = fx.var("hidden", 1, StorageClass::Static, false);
    let id = fx.repo.insert_global_variable(&decl).unwrap();

    let var = fx.repo.definition(id).and_then(Definition::as_variable).unwrap();
    assert!(!var.is_external);
    assert!(!var.is_tentative);
}

#[test]
fn implicit_call_then_definition_share_id() {
    let mut fx = full();
    let name = fx.name("helper");
    let implicit = ProtoDecl {
        name,
        stamp: Stamp::new(90),
        storage: StorageClass::Extern,
        ty: TypeExpr::unprototyped(TypeExpr::int(IntKind::Int)),
        loc: fx.loc(3),
    };
    let call_site = fx
        .repo
        .insert_global_declaration(&Declaration::Prototype(implicit))
        .unwrap();

    let def = fx.fun("helper", 7, Vec::new());
    let definition = fx.repo.insert_function_definition(&def).unwrap();

    assert_eq!(call_site, definition);
    assert_eq!(fx.repo.definition_by_name(name), Some(definition));
    assert_eq!(fx.repo.definition_by_stamp(Stamp::new(90)), Some(definition));
    assert_eq!(fx.repo.definition_by_stamp(Stamp::new(7)), Some(definition));
    assert_eq!(fx.repo.definitions().count(), 1);
}

#[test]
fn void_function_has_no_return_type() {
    let mut fx = full();
    let name = fx.name("reset");
    let proto = ProtoDecl {
        name,
        stamp: Stamp::new(2),
        storage: StorageClass::Default,
        ty: TypeExpr::function(TypeExpr::void(), Vec::new(), true),
        loc: fx.loc(3),
    };
    let id = fx.repo.insert_prototype(&proto).unwrap();

    let f = fx.repo.definition(id).and_then(Definition::as_function).unwrap();
    assert_eq!(f.ret, None);
    assert!(f.is_variadic);
    assert!(!f.has_body);
}

#[test]
fn function_parameters_are_interned() {
    let mut fx = full();
    let p = ParamDecl {
        name: fx.name("p"),
        stamp: Stamp::new(8),
        ty: TypeExpr::pointer(TypeExpr::int(IntKind::Char)),
    };
    let decl = fx.fun("f", 7, vec![p]);
    let id = fx.repo.insert_function_definition(&decl).unwrap();

    let f = fx.repo.definition(id).and_then(Definition::as_function).unwrap();
    let char_ptr = fx.repo.types.lookup(&TypeExpr::pointer(TypeExpr::int(IntKind::Char)));
    assert_eq!(f.params.len(), 1);
    assert_eq!(Some(f.params[0].ty), char_ptr);
}

// -- Tagged types --

#[test]
fn struct_forward_reference_patched_by_definition() {
    let mut fx = full();
    let tag = fx.name("node");
    let next = fx.name("next");
    let node = TypeExpr::composite(CompositeKind::Struct, tag, Stamp::new(30));

    // `struct node *` used before the body is seen.
    let ptr = fx.repo.intern_type(&TypeExpr::pointer(node.clone()));
    let Some(TypeDescriptor::Pointer { pointee }) = fx.repo.type_descriptor(ptr).cloned() else {
        panic!("expected pointer");
    };

    let decl = CompositeDecl {
        kind: CompositeKind::Struct,
        tag,
        stamp: Stamp::new(30),
        loc: fx.loc(4),
        fields: Some(vec![FieldDecl {
            name: next,
            ty: TypeExpr::pointer(node),
            bit_width: None,
        }]),
        byte_size: Some(8),
    };
    let id = fx
        .repo
        .insert_global_declaration(&Declaration::Composite(decl))
        .unwrap();

    assert_eq!(id, pointee);
    let Some(TypeDescriptor::Composite(c)) = fx.repo.type_descriptor(pointee) else {
        panic!("expected composite");
    };
    assert!(c.is_defined);
    assert_eq!(c.byte_size, Some(8));
    assert_eq!(c.fields.len(), 1);
    assert_eq!(c.fields[0].ty, ptr);
    assert_eq!(c.loc, Some(fx.loc(4)));
}

#[test]
fn bitfield_width_is_recorded() {
    let mut fx = full();
    let tag = fx.name("flags");
    let bit = fx.name("ready");
    let decl = CompositeDecl {
        kind: CompositeKind::Struct,
        tag,
        stamp: Stamp::new(31),
        loc: fx.loc(4),
        fields: Some(vec![FieldDecl {
            name: bit,
            ty: TypeExpr::int(IntKind::UInt),
            bit_width: Some(1),
        }]),
        byte_size: None,
    };
    let id = fx.repo.define_composite(&decl).unwrap();

    let Some(TypeDescriptor::Composite(c)) = fx.repo.type_descriptor(id) else {
        panic!("expected composite");
    };
    assert_eq!(c.fields[0].bit_size, Some(1));
    assert_eq!(c.byte_size, None);
}

#[test]
fn backend_layout_updates_patch_in_place() {
    let mut fx = full();
    let tag = fx.name("flags");
    let bit = fx.name("ready");
    let count = fx.name("count");
    let uint = fx.name("unsigned int");
    let decl = CompositeDecl {
        kind: CompositeKind::Struct,
        tag,
        stamp: Stamp::new(31),
        loc: fx.loc(4),
        fields: Some(vec![
            FieldDecl {
                name: bit,
                ty: TypeExpr::int(IntKind::UInt),
                bit_width: Some(1),
            },
            FieldDecl {
                name: count,
                ty: TypeExpr::int(IntKind::Int),
                bit_width: None,
            },
        ]),
        byte_size: None,
    };
    let id = fx.repo.define_composite(&decl).unwrap();
    let layout = BitfieldLayout {
        bit_size: 1,
        bit_offset: 0,
        byte_offset: 0,
        byte_size: 4,
        base: uint,
    };

    assert_eq!(fx.repo.set_composite_size(id, 8), Ok(true));
    assert_eq!(fx.repo.set_composite_size(id, 8), Ok(false));
    assert_eq!(fx.repo.set_bitfield_layout(id, bit, layout), Ok(true));
    assert_eq!(fx.repo.set_member_byte_offset(id, count, 4), Ok(true));
    let missing = fx.name("missing");
    assert_eq!(fx.repo.set_member_byte_offset(id, missing, 4), Ok(false));

    let Some(TypeDescriptor::Composite(c)) = fx.repo.type_descriptor(id) else {
        panic!("expected composite");
    };
    assert_eq!(c.byte_size, Some(8));
    assert_eq!(c.fields[0].bitfield_base, Some(uint));
    assert_eq!(c.fields[0].byte_size, Some(4));
    assert_eq!(c.fields[1].byte_offset, Some(4));
}

#[test]
fn enum_definition_patches_forward_reference() {
    let mut fx = full();
    let tag = fx.name("color");
    let red = fx.name("RED");
    let forward = fx
        .repo
        .intern_type(&TypeExpr::enumeration(tag, Stamp::new(40)));

    let decl = EnumDecl {
        tag,
        stamp: Stamp::new(40),
        loc: fx.loc(6),
        enumerators: vec![Enumerator { name: red, value: 0 }],
        byte_size: Some(4),
    };
    let id = fx.repo.insert_global_declaration(&Declaration::Enum(decl)).unwrap();

    assert_eq!(id, forward);
    let Some(TypeDescriptor::Enum(e)) = fx.repo.type_descriptor(id) else {
        panic!("expected enum");
    };
    assert_eq!(e.enumerators, vec![Enumerator { name: red, value: 0 }]);
    assert_eq!(e.byte_size, Some(4));
}

#[test]
fn typedef_resolves_target() {
    let mut fx = full();
    let name = fx.name("u8");
    let decl = TypedefDecl {
        name,
        stamp: Stamp::new(50),
        ty: TypeExpr::int(IntKind::UChar),
        loc: fx.loc(2),
    };
    let id = fx
        .repo
        .insert_global_declaration(&Declaration::Typedef(decl))
        .unwrap();
    let uchar = fx.repo.intern_type(&TypeExpr::int(IntKind::UChar));

    let Some(TypeDescriptor::Typedef(t)) = fx.repo.type_descriptor(id) else {
        panic!("expected typedef");
    };
    assert_eq!(t.target, Some(uchar));
    assert_eq!(t.loc, Some(fx.loc(2)));
}

#[test]
fn restrict_pointer_shares_id_with_plain_pointer() {
    let mut fx = full();
    let plain = fx.repo.intern_type(&TypeExpr::pointer(TypeExpr::int(IntKind::Int)));
    let restricted = fx
        .repo
        .intern_type(&TypeExpr::pointer(TypeExpr::int(IntKind::Int)).with_attr(Attr::Restrict));

    assert_eq!(plain, restricted);
}

#[test]
fn type_key_mode_decides_same_named_tags() {
    for (mode, merged) in [(TypeKeyMode::Spelling, true), (TypeKeyMode::Structural, false)] {
        let mut fx = Fixture::new(RepoConfig::default().with_type_keys(mode));
        let tag = fx.name("node");
        let outer = fx
            .repo
            .intern_type(&TypeExpr::composite(CompositeKind::Struct, tag, Stamp::new(1)));
        let inner = fx
            .repo
            .intern_type(&TypeExpr::composite(CompositeKind::Struct, tag, Stamp::new(2)));

        assert_eq!(outer == inner, merged, "mode {mode}");
    }
}

#[test]
fn referenced_files_are_collected() {
    let mut fx = full();
    let header = fx.name("util.h");
    let decl = fx.var("g", 1, StorageClass::Default, true);
    fx.repo.insert_global_variable(&decl).unwrap();
    let td = TypedefDecl {
        name: fx.name("word"),
        stamp: Stamp::new(2),
        ty: TypeExpr::int(IntKind::UInt),
        loc: SourceLoc::new(header, 1, 1),
    };
    fx.repo.define_typedef(&td).unwrap();

    let files: Vec<Name> = fx.repo.files().collect();
    assert_eq!(files, vec![fx.file, header]);
}

#[test]
fn patching_wrong_variant_is_an_error() {
    let mut fx = full();
    let int = fx.repo.intern_type(&TypeExpr::int(IntKind::Int));
    let loc = fx.loc(1);

    let err = fx.repo.attach_file_location_if_unset(int, loc).unwrap_err();
    assert!(matches!(err, DebugRepoError::UnexpectedVariant { .. }));
    assert!(fx.repo.set_composite_size(int, 4).is_err());
    assert!(fx.repo.resolve_typedef_target(int, int).is_err());
}

// -- Locals and scopes --

#[test]
fn scope_tree_hangs_off_the_function() {
    let mut fx = full();
    let decl = fx.fun("main", 1, Vec::new());
    let f = fx.repo.insert_function_definition(&decl).unwrap();
    let local = fx.local("i", 10, StorageClass::Auto);
    let var = fx.repo.insert_local_variable(&local).unwrap();

    let root = fx
        .repo
        .enter_function_scope(Stamp::new(1), ScopeId::new(0))
        .unwrap()
        .unwrap();
    let block = fx
        .repo
        .enter_child_scope(Stamp::new(1), ScopeId::new(0), ScopeId::new(1))
        .unwrap()
        .unwrap();
    assert_eq!(
        fx.repo
            .attach_variable_to_scope(Stamp::new(1), Stamp::new(10), ScopeId::new(1)),
        Ok(true)
    );

    let func = fx.repo.definition(f).and_then(Definition::as_function).unwrap();
    assert_eq!(func.root_scope, Some(root));
    assert_eq!(
        fx.repo.local(root).and_then(LocalEntry::as_scope).map(|s| s.children.clone()),
        Some(vec![block])
    );
    assert_eq!(
        fx.repo.local(block).and_then(LocalEntry::as_scope).map(|s| s.children.clone()),
        Some(vec![var])
    );
}

#[test]
fn static_local_is_flagged() {
    let mut fx = full();
    let local = fx.local("calls", 10, StorageClass::Static);
    let id = fx.repo.insert_local_variable(&local).unwrap();

    assert_eq!(fx.repo.local_by_stamp(Stamp::new(10)), Some(id));
    assert!(fx
        .repo
        .local(id)
        .and_then(LocalEntry::as_variable)
        .is_some_and(|v| v.is_static));
}

#[test]
fn scope_of_unknown_function_is_skipped() {
    let mut fx = full();
    assert_eq!(
        fx.repo.enter_function_scope(Stamp::new(77), ScopeId::new(0)),
        Ok(None)
    );
    assert_eq!(fx.repo.locals().count(), 0);
}

#[test]
fn scope_of_global_variable_is_an_error() {
    let mut fx = full();
    let decl = fx.var("g", 1, StorageClass::Default, true);
    fx.repo.insert_global_variable(&decl).unwrap();

    assert!(matches!(
        fx.repo.enter_function_scope(Stamp::new(1), ScopeId::new(0)),
        Err(DebugRepoError::UnexpectedVariant { .. })
    ));
}

#[test]
fn line_tables_only_skips_locals() {
    let mut fx = Fixture::new(RepoConfig::new(DebugLevel::LineTablesOnly));
    let decl = fx.fun("main", 1, Vec::new());
    fx.repo.insert_function_definition(&decl).unwrap();
    let local = fx.local("i", 10, StorageClass::Auto);

    assert_eq!(fx.repo.insert_local_variable(&local), None);
    assert_eq!(
        fx.repo.enter_function_scope(Stamp::new(1), ScopeId::new(0)),
        Ok(None)
    );
    fx.repo.bind_backend_symbol(Stamp::new(1), SymbolId::new(100));
    fx.repo.open_scope(SymbolId::new(100), ScopeId::new(0), a(1));
    fx.repo.function_end(SymbolId::new(100), a(2));

    assert_eq!(fx.repo.locals().count(), 0);
    assert_eq!(fx.repo.scope_range_table().count(), 0);
    // Files are still collected for the line tables.
    assert_eq!(fx.repo.files().count(), 1);
}

// -- Binding and emission --

#[test]
fn binding_fans_out_scopes_and_feeds_ranges() {
    let mut fx = full();
    let p = ParamDecl {
        name: fx.name("n"),
        stamp: Stamp::new(2),
        ty: TypeExpr::int(IntKind::Int),
    };
    let decl = fx.fun("main", 1, vec![p]);
    let f = fx.repo.insert_function_definition(&decl).unwrap();
    let local = fx.local("i", 10, StorageClass::Auto);
    let var = fx.repo.insert_local_variable(&local).unwrap();
    let root = fx
        .repo
        .enter_function_scope(Stamp::new(1), ScopeId::new(0))
        .unwrap()
        .unwrap();

    let sym = SymbolId::new(100);
    assert_eq!(fx.repo.bind_backend_symbol(Stamp::new(1), sym), Some(f));
    assert_eq!(fx.repo.bind_parameter_symbol(Stamp::new(1), Stamp::new(2), SymbolId::new(101)), Ok(true));
    assert_eq!(fx.repo.bind_local_symbol(Stamp::new(10), SymbolId::new(102)), Some(var));
    assert_eq!(fx.repo.bind_function_address_range(sym, a(0x100), a(0x180)), Ok(true));
    assert_eq!(fx.repo.scope_by_symbol(sym, ScopeId::new(0)), Some(root));
    assert_eq!(fx.repo.definition_by_symbol(sym), Some(f));

    fx.repo.open_scope(sym, ScopeId::new(0), a(0x100));
    fx.repo
        .start_live_range(SymbolId::new(102), a(0x108), LocationDesc::Register(5));
    fx.repo.function_end(sym, a(0x180));

    assert_eq!(
        fx.repo.scope_ranges(root),
        &[ScopeRange {
            start: Some(a(0x100)),
            end: Some(a(0x180)),
        }]
    );
    assert_eq!(
        fx.repo.var_location(var),
        Some(&VarLocation::Ranges(vec![LiveRange {
            start: Some(a(0x108)),
            end: Some(a(0x180)),
            location: LocationDesc::Register(5),
        }]))
    );

    let func = fx.repo.definition(f).and_then(Definition::as_function).unwrap();
    assert_eq!(func.params[0].symbol, Some(SymbolId::new(101)));
    assert_eq!(func.pc_range.map(|r| (r.low, r.high)), Some((a(0x100), a(0x180))));
}

fn implicit_then_defined(fx: &mut Fixture) -> DebugId {
    let name = fx.name("helper");
    let implicit = ProtoDecl {
        name,
        stamp: Stamp::new(1),
        storage: StorageClass::Extern,
        ty: TypeExpr::unprototyped(TypeExpr::int(IntKind::Int)),
        loc: fx.loc(3),
    };
    fx.repo
        .insert_global_declaration(&Declaration::Prototype(implicit))
        .unwrap();
    let def = fx.fun("helper", 2, Vec::new());
    fx.repo.insert_function_definition(&def).unwrap()
}

#[test]
fn binding_through_implicit_stamp_fans_out_defined_scopes() {
    let mut fx = full();
    implicit_then_defined(&mut fx);
    let sym = SymbolId::new(100);

    let root = fx
        .repo
        .enter_function_scope(Stamp::new(2), ScopeId::new(0))
        .unwrap();
    let inner = fx
        .repo
        .enter_child_scope(Stamp::new(2), ScopeId::new(0), ScopeId::new(1))
        .unwrap();
    assert!(fx.repo.bind_backend_symbol(Stamp::new(1), sym).is_some());

    assert_eq!(fx.repo.scope_by_symbol(sym, ScopeId::new(0)), root);
    assert_eq!(fx.repo.scope_by_symbol(sym, ScopeId::new(1)), inner);
}

#[test]
fn scope_under_defining_stamp_after_implicit_binding_is_mirrored() {
    let mut fx = full();
    implicit_then_defined(&mut fx);
    let sym = SymbolId::new(100);
    fx.repo.bind_backend_symbol(Stamp::new(1), sym);

    let root = fx
        .repo
        .enter_function_scope(Stamp::new(2), ScopeId::new(0))
        .unwrap();
    assert!(root.is_some());
    assert_eq!(fx.repo.scope_by_symbol(sym, ScopeId::new(0)), root);
}

#[test]
fn scope_entered_after_binding_is_addressable_by_symbol() {
    let mut fx = full();
    let decl = fx.fun("main", 1, Vec::new());
    fx.repo.insert_function_definition(&decl).unwrap();
    fx.repo.bind_backend_symbol(Stamp::new(1), SymbolId::new(100));

    let root = fx
        .repo
        .enter_function_scope(Stamp::new(1), ScopeId::new(0))
        .unwrap();
    assert_eq!(fx.repo.scope_by_symbol(SymbolId::new(100), ScopeId::new(0)), root);
}

#[test]
fn events_for_unknown_symbols_are_dropped() {
    let mut fx = full();
    fx.repo.open_scope(SymbolId::new(1), ScopeId::new(0), a(1));
    fx.repo.close_scope(SymbolId::new(1), ScopeId::new(0), a(2));
    fx.repo
        .start_live_range(SymbolId::new(2), a(1), LocationDesc::Register(0));
    fx.repo.end_live_range(SymbolId::new(2), a(2));
    fx.repo
        .stack_variable(SymbolId::new(2), 0, LocationDesc::FrameSlot(0));
    fx.repo.function_end(SymbolId::new(1), a(3));

    assert_eq!(fx.repo.bind_backend_symbol(Stamp::new(9), SymbolId::new(1)), None);
    assert_eq!(fx.repo.bind_local_symbol(Stamp::new(9), SymbolId::new(1)), None);
    assert_eq!(fx.repo.bind_function_address_range(SymbolId::new(1), a(0), a(1)), Ok(false));
    assert_eq!(fx.repo.var_locations().count(), 0);
    assert_eq!(fx.repo.scope_range_table().count(), 0);
}

// -- Sections, labels, serializer bookkeeping --

#[test]
fn sections_and_file_enumeration() {
    let mut fx = full();
    let text = fx.name(".text");
    let decl = fx.var("g", 1, StorageClass::Default, true);
    fx.repo.insert_global_variable(&decl).unwrap();

    fx.repo.add_compilation_section_start(text, a(0x1000));
    assert!(fx.repo.section_exists(text));

    let mut closed = Vec::new();
    fx.repo.compute_file_enum(
        |_| a(0x2000),
        |_, _| FileNumber::new(1),
        |section| closed.push(section),
    );

    assert_eq!(closed, vec![text]);
    assert_eq!(fx.repo.section(text).and_then(|s| s.end), Some(a(0x2000)));
    assert_eq!(fx.repo.file_number(text, fx.file), Some(FileNumber::new(1)));
    assert_eq!(fx.repo.sections().count(), 1);

    let mut files = Vec::new();
    fx.repo.for_each_file(|f| files.push(f));
    assert_eq!(files, vec![fx.file]);
}

#[test]
fn labels_and_printed_globals() {
    let mut fx = full();
    let name = fx.name("g");
    fx.repo.add_label(SymbolId::new(1), 3, a(0x44));
    fx.repo.mark_variable_printed(name);

    assert_eq!(fx.repo.translate_label(SymbolId::new(1), 3), Some(a(0x44)));
    assert_eq!(fx.repo.translate_label(SymbolId::new(1), 4), None);
    assert!(fx.repo.is_variable_printed(name));

    fx.repo.init("next.c");
    assert_eq!(fx.repo.translate_label(SymbolId::new(1), 3), None);
    assert!(!fx.repo.is_variable_printed(name));
}
