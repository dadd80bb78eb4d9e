use crate::error::{CasError, Result};
use crate::expr::{Expr, Rational};
use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{alpha1, alphanumeric0, char, digit0, digit1, multispace0};
use nom::combinator::{all_consuming, map, map_res, not, opt, recognize};
use nom::error::{VerboseError, convert_error};
use nom::multi::fold_many0;
use nom::sequence::{delimited, pair, preceded, terminated};
use num_bigint::{BigInt, ParseBigIntError};
use num_traits::Num;

/// Parse `input` into an expression tree. Any identifier is accepted as a variable.
pub fn parse_expr(input: &str) -> Result<Expr> {
    match all_consuming(ws(parse_add_sub))(input) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(CasError::Parse(convert_error(input, e)))
        }
        Err(nom::Err::Incomplete(_)) => Err(CasError::Parse("incomplete input".to_string())),
    }
}

/// Parse `input` with `var` as the only recognized symbol.
pub fn parse_in(input: &str, var: &str) -> Result<Expr> {
    let expr = parse_expr(input)?;
    if let Some(unknown) = expr.free_variables().into_iter().find(|name| name != var) {
        return Err(CasError::Parse(format!(
            "unknown symbol `{unknown}`; only `{var}` is recognized"
        )));
    }
    Ok(expr)
}

fn parse_add_sub(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    let (rest, init) = parse_mul_div(input)?;
    fold_many0(
        pair(ws(alt((char('+'), char('-')))), parse_mul_div),
        move || init.clone(),
        |acc, (op, rhs)| match op {
            '+' => Expr::Add(acc.boxed(), rhs.boxed()),
            _ => Expr::Sub(acc.boxed(), rhs.boxed()),
        },
    )(rest)
}

fn parse_mul_div(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    let (rest, init) = parse_unary(input)?;
    fold_many0(
        pair(
            ws(alt((terminated(char('*'), not(char('*'))), char('/')))),
            parse_unary,
        ),
        move || init.clone(),
        |acc, (op, rhs)| match op {
            '*' => Expr::Mul(acc.boxed(), rhs.boxed()),
            _ => Expr::Div(acc.boxed(), rhs.boxed()),
        },
    )(rest)
}

// Unary minus binds looser than powers: -Q^2 is -(Q^2).
fn parse_unary(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    if let Ok((rest, expr)) = preceded(ws(char('-')), parse_unary)(input) {
        Ok((rest, Expr::Neg(expr.boxed())))
    } else if let Ok((rest, expr)) = preceded(ws(char('+')), parse_unary)(input) {
        Ok((rest, expr))
    } else {
        parse_pow(input)
    }
}

fn parse_pow(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    let (rest, base) = parse_primary(input)?;
    if let Ok((next, exp)) = preceded(ws(alt((tag("**"), tag("^")))), parse_unary)(rest) {
        Ok((next, Expr::Pow(base.boxed(), exp.boxed())))
    } else {
        Ok((rest, base))
    }
}

fn parse_primary(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    alt((parse_parens, parse_function, parse_number, parse_identifier))(input)
}

fn parse_parens(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    delimited(ws(char('(')), parse_add_sub, ws(char(')')))(input)
}

fn parse_number(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    map_res(
        ws(recognize(alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )))),
        |s: &str| decimal_to_rational(s).map(Expr::Constant),
    )(input)
}

fn parse_identifier(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    map(ws(recognize(pair(alpha1, alphanumeric0))), |s: &str| {
        Expr::Variable(s.to_string())
    })(input)
}

fn parse_function(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    let (rest, (name, arg)) = pair(
        ws(alt((
            tag("sqrt"),
            tag("sin"),
            tag("cos"),
            tag("tan"),
            tag("exp"),
            tag("log"),
            tag("ln"),
        ))),
        delimited(ws(char('(')), parse_add_sub, ws(char(')'))),
    )(input)?;

    let expr = match name {
        "sqrt" => crate::expr::sqrt(arg),
        "sin" => Expr::Sin(arg.boxed()),
        "cos" => Expr::Cos(arg.boxed()),
        "tan" => Expr::Tan(arg.boxed()),
        "exp" => Expr::Exp(arg.boxed()),
        _ => Expr::Log(arg.boxed()),
    };

    Ok((rest, expr))
}

/// `12.5` becomes the exact rational 25/2.
fn decimal_to_rational(text: &str) -> std::result::Result<Rational, ParseBigIntError> {
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text, ""));
    let digits = format!("{int_part}{frac_part}");
    let numer = if digits.is_empty() {
        BigInt::from(0)
    } else {
        BigInt::from_str_radix(&digits, 10)?
    };
    let denom = BigInt::from(10).pow(frac_part.len() as u32);
    Ok(Rational::new(numer, denom))
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O, VerboseError<&'a str>>
where
    F: FnMut(&'a str) -> IResult<&'a str, O, VerboseError<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}
