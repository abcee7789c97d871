//! Unit tests for the tree model.
//!
//! This module covers the structural rewrite primitives, sibling navigation,
//! the kind-based visitor dispatch and the tree dump.

use super::{
    ast::{Ast, NodeId, SlotKey},
    nodes::{BasicType, BinaryOperator, NodeKind, LEFT, RIGHT, TYPE, VALUE},
    printer::dump,
    visitor::{walk_children, Visitor},
};
use crate::errors::errors::Error;

fn block_of_numbers(ast: &mut Ast, values: &[i64]) -> (NodeId, Vec<NodeId>) {
    let numbers: Vec<NodeId> = values.iter().map(|v| ast.create_number(*v, None)).collect();
    let block = ast.create_block(&numbers, None).unwrap();
    (block, numbers)
}

fn assert_contiguous(ast: &Ast, parent: NodeId) {
    for (index, child) in ast.children(parent).into_iter().enumerate() {
        assert_eq!(ast.parent(child), Some(parent));
        assert_eq!(ast.selfref(child), Some(SlotKey::Index(index)));
    }
}

#[test]
fn test_add_child_sets_parent_and_index() {
    let mut ast = Ast::new();
    let (block, numbers) = block_of_numbers(&mut ast, &[1, 2, 3]);

    assert_eq!(ast.len(block), 3);
    assert_eq!(ast.selfref(numbers[2]), Some(SlotKey::Index(2)));
    assert_contiguous(&ast, block);
}

#[test]
fn test_attaching_detaches_from_previous_owner() {
    let mut ast = Ast::new();
    let (first, numbers) = block_of_numbers(&mut ast, &[1, 2, 3]);
    let second = ast.create_block(&[], None).unwrap();

    ast.add_child(second, numbers[0]).unwrap();

    assert_eq!(ast.children(first), vec![numbers[1], numbers[2]]);
    assert_eq!(ast.parent(numbers[0]), Some(second));
    assert_contiguous(&ast, first);
}

#[test]
fn test_replace_in_sequence_splices_and_reindexes() {
    let mut ast = Ast::new();
    let (block, numbers) = block_of_numbers(&mut ast, &[1, 2, 3]);
    let a = ast.create_number(10, None);
    let b = ast.create_number(20, None);

    ast.replace(numbers[1], &[a, b]).unwrap();

    assert_eq!(ast.children(block), vec![numbers[0], a, b, numbers[2]]);
    assert_eq!(ast.parent(numbers[1]), None);
    assert_eq!(ast.selfref(numbers[1]), None);
    assert_eq!(ast.selfref(a), Some(SlotKey::Index(1)));
    assert_contiguous(&ast, block);
}

#[test]
fn test_replace_with_earlier_sibling() {
    let mut ast = Ast::new();
    let (block, numbers) = block_of_numbers(&mut ast, &[1, 2, 3, 4]);

    ast.replace(numbers[2], &[numbers[0]]).unwrap();

    assert_eq!(ast.children(block), vec![numbers[1], numbers[0], numbers[3]]);
    assert_contiguous(&ast, block);
}

#[test]
fn test_replace_in_keyed_slot() {
    let mut ast = Ast::new();
    let left = ast.create_number(1, None);
    let right = ast.create_number(2, None);
    let sum = ast.create_binary(BinaryOperator::Sum, left, right, None).unwrap();
    let other = ast.create_number(3, None);

    ast.replace(left, &[other]).unwrap();

    assert_eq!(ast.slot(sum, LEFT), Some(other));
    assert_eq!(ast.parent(other), Some(sum));
    assert_eq!(ast.selfref(other), Some(SlotKey::Named(LEFT)));
    assert_eq!(ast.parent(left), None);
}

#[test]
fn test_replace_keyed_slot_rejects_several_nodes() {
    let mut ast = Ast::new();
    let left = ast.create_number(1, None);
    let right = ast.create_number(2, None);
    ast.create_binary(BinaryOperator::Sum, left, right, None).unwrap();
    let a = ast.create_number(3, None);
    let b = ast.create_number(4, None);

    let error = ast.replace(left, &[a, b]).unwrap_err();
    assert_eq!(error.get_error_name(), "StructuralViolation");
}

#[test]
fn test_replace_detached_node_fails() {
    let mut ast = Ast::new();
    let lonely = ast.create_number(1, None);
    let other = ast.create_number(2, None);

    let error = ast.replace(lonely, &[other]).unwrap_err();
    assert_eq!(error.get_error_name(), "StructuralViolation");
}

#[test]
fn test_replace_with_own_ancestor_fails() {
    let mut ast = Ast::new();
    let left = ast.create_number(1, None);
    let right = ast.create_number(2, None);
    let sum = ast.create_binary(BinaryOperator::Sum, left, right, None).unwrap();
    let block = ast.create_block(&[sum], None).unwrap();
    ast.add_child(ast.root(), block).unwrap();

    let error = ast.replace(left, &[sum]).unwrap_err();
    assert_eq!(error.get_error_name(), "StructuralViolation");
    assert_eq!(ast.parent(left), Some(sum));
}

#[test]
fn test_overwriting_slot_clears_displaced_child() {
    let mut ast = Ast::new();
    let value = ast.create_number(1, None);
    let print = ast.create_print(value, None).unwrap();
    let other = ast.create_number(2, None);

    ast.set(print, SlotKey::Named(VALUE), Some(other)).unwrap();

    assert_eq!(ast.slot(print, VALUE), Some(other));
    assert_eq!(ast.parent(value), None);
    assert_eq!(ast.selfref(value), None);
}

#[test]
fn test_delete_from_sequence() {
    let mut ast = Ast::new();
    let (block, numbers) = block_of_numbers(&mut ast, &[1, 2, 3]);

    let removed = ast.delete(block, SlotKey::Index(0)).unwrap();

    assert_eq!(removed, Some(numbers[0]));
    assert_eq!(ast.children(block), vec![numbers[1], numbers[2]]);
    assert_contiguous(&ast, block);
}

#[test]
fn test_missing_slot_is_structural_violation() {
    let mut ast = Ast::new();
    let number = ast.create_number(1, None);
    let other = ast.create_number(2, None);

    let error = ast.set_slot(number, LEFT, Some(other)).unwrap_err();
    assert_eq!(error.get_error_name(), "StructuralViolation");

    let error = ast.expect_slot(number, TYPE).unwrap_err();
    assert_eq!(error.get_error_name(), "StructuralViolation");
}

#[test]
fn test_unlink_and_next() {
    let mut ast = Ast::new();
    let (block, numbers) = block_of_numbers(&mut ast, &[1, 2, 3]);

    assert_eq!(ast.next(numbers[0]), Some(numbers[1]));
    assert_eq!(ast.next(numbers[2]), None);

    ast.unlink(numbers[1]).unwrap();

    assert_eq!(ast.next(numbers[0]), Some(numbers[2]));
    assert_eq!(ast.parent(numbers[1]), None);
    assert_eq!(ast.len(block), 2);
}

#[test]
fn test_next_in_keyed_parent_is_none() {
    let mut ast = Ast::new();
    let left = ast.create_number(1, None);
    let right = ast.create_number(2, None);
    ast.create_binary(BinaryOperator::Lt, left, right, None).unwrap();

    assert_eq!(ast.next(left), None);
}

#[test]
fn test_scope_chain_lookup() {
    let mut ast = Ast::new();
    let outer = ast.create_scope(None);
    let inner = ast.create_scope(None);
    let sibling = ast.create_scope(None);
    ast.set_parent_scope(inner, Some(outer)).unwrap();
    ast.set_parent_scope(sibling, Some(outer)).unwrap();

    let x = ast.create_variable("x", None);
    let y = ast.create_variable("y", None);
    ast.register(outer, "x", x).unwrap();
    ast.register(sibling, "y", y).unwrap();

    assert_eq!(ast.resolve(inner, "x"), Some(x));
    assert_eq!(ast.resolve(inner, "y"), None);

    let error = ast.register(outer, "x", y).unwrap_err();
    assert_eq!(error.get_error_name(), "AlreadyDeclared");
}

#[test]
fn test_set_type_is_write_once() {
    let mut ast = Ast::new();
    let int32 = ast.create_type(BasicType::Int32);
    let int64 = ast.create_type(BasicType::Int64);
    let variable = ast.create_variable("x", None);

    ast.set_type(variable, int32).unwrap();
    ast.set_type(variable, int32).unwrap();
    assert_eq!(ast.target_basic_type(variable), Some(BasicType::Int32));

    let error = ast.set_type(variable, int64).unwrap_err();
    assert_eq!(error.get_error_name(), "TypeMismatch");
}

#[test]
fn test_bind_reference_is_write_once() {
    let mut ast = Ast::new();
    let reference = ast.create_reference("x", None);
    let first = ast.create_variable("x", None);
    let second = ast.create_variable("x", None);

    ast.bind_reference(reference, first).unwrap();
    ast.bind_reference(reference, first).unwrap();

    assert!(ast.bind_reference(reference, second).is_err());
    assert_eq!(ast.reference_target(reference), Some(first));
}

#[derive(Default)]
struct Counter {
    arithmetic: usize,
    comparisons: usize,
    binary: usize,
    sums: usize,
    numbers: usize,
}

impl Visitor for Counter {
    fn visit_binary_op(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.binary += 1;
        walk_children(self, ast, id)
    }

    fn visit_arithmetic(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.arithmetic += 1;
        self.visit_binary_op(ast, id)
    }

    fn visit_comparison(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.comparisons += 1;
        self.visit_binary_op(ast, id)
    }

    fn visit_sum(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.sums += 1;
        walk_children(self, ast, id)
    }

    fn visit_number(&mut self, _ast: &mut Ast, _id: NodeId) -> Result<(), Error> {
        self.numbers += 1;
        Ok(())
    }
}

#[test]
fn test_visitor_falls_back_to_operator_groups() {
    let mut ast = Ast::new();
    let one = ast.create_number(1, None);
    let two = ast.create_number(2, None);
    let sum = ast.create_binary(BinaryOperator::Sum, one, two, None).unwrap();
    let three = ast.create_number(3, None);
    let product = ast.create_binary(BinaryOperator::Mul, sum, three, None).unwrap();
    let four = ast.create_number(4, None);
    let compare = ast.create_binary(BinaryOperator::Gt, product, four, None).unwrap();
    let print = ast.create_print(compare, None).unwrap();
    ast.add_child(ast.root(), print).unwrap();

    let mut counter = Counter::default();
    let root = ast.root();
    counter.visit(&mut ast, root).unwrap();

    // The sum has its own handler, so only Mul reaches the arithmetic group.
    assert_eq!(counter.sums, 1);
    assert_eq!(counter.arithmetic, 1);
    assert_eq!(counter.comparisons, 1);
    assert_eq!(counter.binary, 2);
    assert_eq!(counter.numbers, 4);
}

/// Moves every following sibling of a number into a fresh block, the way a
/// declaration rewrite does.
struct Swallower {
    visited: Vec<i64>,
}

impl Visitor for Swallower {
    fn visit_number(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        if let NodeKind::Number { value } = ast.kind(id) {
            self.visited.push(*value);
        }
        let parent = ast.parent(id).unwrap();
        if ast.is_sequence(parent) && self.visited.len() == 1 {
            let mut moved = Vec::new();
            while let Some(next) = ast.next(id) {
                ast.unlink(next)?;
                moved.push(next);
            }
            let block = ast.create_block(&moved, None)?;
            ast.add_child(parent, block)?;
            self.visit(ast, block)?;
        }
        Ok(())
    }
}

#[test]
fn test_walk_skips_relocated_children() {
    let mut ast = Ast::new();
    let (block, _) = block_of_numbers(&mut ast, &[1, 2, 3]);
    ast.add_child(ast.root(), block).unwrap();

    let mut swallower = Swallower { visited: vec![] };
    let root = ast.root();
    swallower.visit(&mut ast, root).unwrap();

    // 2 and 3 are visited once, under their new block.
    assert_eq!(swallower.visited, vec![1, 2, 3]);
    assert_eq!(ast.len(block), 2);
}

#[test]
fn test_dump() {
    let mut ast = Ast::new();
    let int32 = ast.create_type(BasicType::Int32);
    let one = ast.create_number(1, None);
    ast.set_type(one, int32).unwrap();
    let x = ast.create_reference("x", None);
    let sum = ast.create_binary(BinaryOperator::Sum, one, x, None).unwrap();
    let print = ast.create_print(sum, None).unwrap();
    ast.add_child(ast.root(), print).unwrap();

    let expected = "Module\n    Print\n        Sum [?]\n            Number '1' [int32]\n            Reference 'x' [?]\n";
    assert_eq!(dump(&ast, ast.root()), expected);
    assert_eq!(ast.slot(sum, RIGHT), Some(x));
}
