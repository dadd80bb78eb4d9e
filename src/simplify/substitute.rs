use crate::expr::Expr;

/// Replace every occurrence of `var` in `expr` with `replacement`. No simplification is applied.
pub fn substitute(expr: &Expr, var: &str, replacement: &Expr) -> Expr {
    let go = |inner: &Expr| substitute(inner, var, replacement).boxed();
    match expr {
        Expr::Variable(name) if name == var => replacement.clone(),
        Expr::Variable(_) | Expr::Constant(_) => expr.clone(),
        Expr::Add(a, b) => Expr::Add(go(a), go(b)),
        Expr::Sub(a, b) => Expr::Sub(go(a), go(b)),
        Expr::Mul(a, b) => Expr::Mul(go(a), go(b)),
        Expr::Div(a, b) => Expr::Div(go(a), go(b)),
        Expr::Pow(a, b) => Expr::Pow(go(a), go(b)),
        Expr::Neg(a) => Expr::Neg(go(a)),
        Expr::Sin(a) => Expr::Sin(go(a)),
        Expr::Cos(a) => Expr::Cos(go(a)),
        Expr::Tan(a) => Expr::Tan(go(a)),
        Expr::Exp(a) => Expr::Exp(go(a)),
        Expr::Log(a) => Expr::Log(go(a)),
    }
}
