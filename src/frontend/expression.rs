use crate::{
    ast::{BinaryOperator, ExprKind, ExprNode, UnaryOperator},
    error::SemanticError,
    frontend::{
        config::Resolution,
        lexer::Position,
        types::{self, Side, TypeRegistry},
    },
};

/// Leaf for an integer literal, typed by its width.
#[must_use]
pub fn integer(value: i64) -> ExprNode {
    ExprNode::new(ExprKind::Integer(value), types::integer_literal_type(value))
}

/// Leaf for a floating point literal.
#[must_use]
pub fn float(value: f64) -> ExprNode {
    ExprNode::new(ExprKind::Float(value.into()), types::SINGLE)
}

/// Leaf for a string literal.
#[must_use]
pub fn string(value: &str) -> ExprNode {
    ExprNode::new(ExprKind::Str(value.to_string()), types::STRING)
}

/// Leaf for `TRUE` or `FALSE`.
#[must_use]
pub fn boolean(value: bool) -> ExprNode {
    ExprNode::new(ExprKind::Boolean(value), types::BOOLEAN)
}

/// Builds a binary node and resolves its type.
///
/// Arithmetic levels promote to the higher-ranked operand type and annotate
/// the other operand with a cast. Comparison levels always yield `boolean`
/// and never cast. Logical levels require boolean operands.
///
/// # Errors
/// Returns a [`SemanticError`] when the operand types do not suit the
/// level's rule.
///
/// ```
/// use transbasic::{
///     ast::BinaryOperator,
///     frontend::{config::Resolution, expression, lexer::Position, types::TypeRegistry},
/// };
///
/// let types = TypeRegistry::with_builtins();
/// let sum = expression::binary(BinaryOperator::Add,
///                              expression::integer(2),
///                              expression::float(0.5),
///                              Resolution::Arithmetic,
///                              &types,
///                              Position::default()).unwrap();
/// assert_eq!(sum.datatype, "single");
/// assert_eq!(sum.left().unwrap().cast.as_deref(), Some("single"));
/// assert_eq!(sum.right().unwrap().cast, None);
/// ```
pub fn binary(op: BinaryOperator,
              mut left: ExprNode,
              mut right: ExprNode,
              resolution: Resolution,
              types: &TypeRegistry,
              pos: Position)
              -> Result<ExprNode, SemanticError> {
    let datatype = match resolution {
        Resolution::Arithmetic => {
            let promotion = types.promote(&left.datatype, &right.datatype)
                                 .map_err(|datatype| SemanticError::NonNumericOperand { op: op.to_string(),
                                                                                        datatype,
                                                                                        pos })?;
            match promotion.cast {
                Some(Side::Left) => left.cast = Some(promotion.result.clone()),
                Some(Side::Right) => right.cast = Some(promotion.result.clone()),
                None => {},
            }
            promotion.result
        },
        Resolution::Comparison => {
            if !types.comparable(&left.datatype, &right.datatype) {
                return Err(SemanticError::IncomparableOperands { left: left.datatype,
                                                                 right: right.datatype,
                                                                 pos });
            }
            types::BOOLEAN.to_string()
        },
        Resolution::Logical => {
            for operand in [&left, &right] {
                if !is_boolean(&operand.datatype) {
                    return Err(SemanticError::NonBooleanOperand { op: op.to_string(),
                                                                  datatype: operand.datatype
                                                                                   .clone(),
                                                                  pos });
                }
            }
            types::BOOLEAN.to_string()
        },
    };

    Ok(ExprNode::new(ExprKind::Binary { op,
                                        left: Box::new(left),
                                        right: Box::new(right) },
                     datatype))
}

/// Builds a prefix node.
///
/// # Errors
/// Negation needs a numeric operand; `NOT` needs a boolean one.
pub fn unary(op: UnaryOperator,
             operand: ExprNode,
             types: &TypeRegistry,
             pos: Position)
             -> Result<ExprNode, SemanticError> {
    let datatype = match op {
        UnaryOperator::Negate => {
            if !types.is_numeric(&operand.datatype) {
                return Err(SemanticError::NonNumericOperand { op: "-".to_string(),
                                                              datatype: operand.datatype,
                                                              pos });
            }
            operand.datatype.clone()
        },
        UnaryOperator::Not => {
            if !is_boolean(&operand.datatype) {
                return Err(SemanticError::NonBooleanOperand { op: "NOT".to_string(),
                                                              datatype: operand.datatype,
                                                              pos });
            }
            types::BOOLEAN.to_string()
        },
    };
    Ok(ExprNode::new(ExprKind::Unary { op,
                                       operand: Box::new(operand) },
                     datatype))
}

/// Checks that `node` can steer `IF`, `WHILE` or `DO`: boolean or numeric.
///
/// # Errors
/// Returns [`SemanticError::TypeMismatch`] for any other type.
pub fn check_condition(node: &ExprNode,
                       types: &TypeRegistry,
                       pos: Position)
                       -> Result<(), SemanticError> {
    if is_boolean(&node.datatype) || types.is_numeric(&node.datatype) {
        Ok(())
    } else {
        Err(SemanticError::TypeMismatch { expected: types::BOOLEAN.to_string(),
                                          found: node.datatype.clone(),
                                          pos })
    }
}

fn is_boolean(datatype: &str) -> bool {
    datatype.eq_ignore_ascii_case(types::BOOLEAN)
}
