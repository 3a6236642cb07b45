use rent_core::models::{LinearProgram, Sense};
use std::io::Write;

/// Export a linear program to free `.mps` format.
///
/// MPS minimizes by convention, so the objective row `obj` carries the negated
/// coefficients. All variables are declared free; any sign restrictions are
/// already present as explicit rows.
pub fn export_mps(
    name: &str,
    program: &LinearProgram,
    buffer: &mut impl Write,
) -> Result<(), std::io::Error> {
    // https://www.ibm.com/docs/en/icos/22.1.2?topic=standard-records-in-mps-format
    // is a good reference.
    writeln!(buffer, "NAME {name}")?;
    writeln!(buffer, "ROWS")?;
    writeln!(buffer, " N    obj")?;
    for constraint in program.constraints() {
        let kind = match constraint.sense {
            Sense::Equal => "E",
            Sense::AtMost => "L",
            Sense::AtLeast => "G",
        };
        writeln!(buffer, " {kind}    {}", constraint.name)?;
    }

    // MPS is column-major, so each variable lists the rows it appears in
    writeln!(buffer, "COLUMNS")?;
    for (col, variable) in program.variables().iter().enumerate() {
        let cost = program.objective()[col];
        if cost != 0.0 {
            writeln!(buffer, "    {variable}    obj    {}", -cost)?;
        }
        for constraint in program.constraints() {
            let value = constraint.coefficients[col];
            if value != 0.0 {
                writeln!(buffer, "    {variable}    {}    {value}", constraint.name)?;
            }
        }
    }

    writeln!(buffer, "RHS")?;
    for constraint in program.constraints() {
        if constraint.bound != 0.0 {
            writeln!(buffer, "    rhs    {}    {}", constraint.name, constraint.bound)?;
        }
    }

    writeln!(buffer, "BOUNDS")?;
    for variable in program.variables() {
        writeln!(buffer, " FR BND    {variable}")?;
    }

    writeln!(buffer, "ENDATA")?;
    Ok(())
}

/// Export a linear program to CPLEX `.lp` format
pub fn export_lp(program: &LinearProgram, buffer: &mut impl Write) -> Result<(), std::io::Error> {
    writeln!(buffer, "Maximize")?;
    writeln!(
        buffer,
        " obj: {}",
        expression(program.variables(), program.objective())
    )?;

    writeln!(buffer, "Subject To")?;
    for constraint in program.constraints() {
        let relation = match constraint.sense {
            Sense::Equal => "=",
            Sense::AtMost => "<=",
            Sense::AtLeast => ">=",
        };
        writeln!(
            buffer,
            " {}: {} {relation} {}",
            constraint.name,
            expression(program.variables(), &constraint.coefficients),
            constraint.bound
        )?;
    }

    // LP format variables default to x ≥ 0
    writeln!(buffer, "Bounds")?;
    for variable in program.variables() {
        writeln!(buffer, " {variable} free")?;
    }

    writeln!(buffer, "End")?;
    Ok(())
}

fn expression(variables: &[String], coefficients: &[f64]) -> String {
    let mut terms = String::new();
    for (variable, &value) in variables.iter().zip(coefficients) {
        if value == 0.0 {
            continue;
        }
        let sign = if value < 0.0 { "-" } else { "+" };
        if terms.is_empty() {
            if value < 0.0 {
                terms.push_str("- ");
            }
        } else {
            terms.push_str(&format!(" {sign} "));
        }
        let magnitude = value.abs();
        if magnitude == 1.0 {
            terms.push_str(variable);
        } else {
            terms.push_str(&format!("{magnitude} {variable}"));
        }
    }
    if terms.is_empty() {
        terms.push('0');
    }
    terms
}
