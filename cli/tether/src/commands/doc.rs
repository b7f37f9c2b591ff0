//! `tether doc` — documentation rule inspection and rewriting.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tether_doc::{
    apply_doc_modifications, class_doc_modifications, class_xpath_doc_modifications,
    function_doc_modifications, function_xpath_doc_modifications, DocModification, MetaClass,
    MetaFunction, StderrSink, Typesystem, XsltProc,
};

/// Which declaration a `doc` command works on.
#[derive(Debug, Clone, clap::Args)]
pub struct Target {
    /// Class name in the typesystem
    #[arg(long)]
    pub class: String,
    /// Minimal signature of one of the class's functions, e.g. "resize(int,int)"
    #[arg(long)]
    pub signature: Option<String>,
    /// The signature names a function added by the typesystem
    #[arg(long, requires = "signature")]
    pub added: bool,
}

/// A class, and optionally one of its functions, resolved from a typesystem.
struct Declaration {
    class: MetaClass,
    function: Option<MetaFunction>,
}

impl Declaration {
    fn resolve(typesystem: &Path, target: &Target) -> Result<Self> {
        let ts = Typesystem::load(typesystem)
            .with_context(|| format!("loading {}", typesystem.display()))?;
        let Some(entry) = ts.find_type(&target.class) else {
            bail!(
                "type '{}' not found in {}",
                target.class,
                typesystem.display()
            );
        };
        let class = MetaClass::new(entry.clone()).with_added_functions();

        let function = match target.signature.as_deref() {
            None => None,
            Some(signature) => {
                let native = MetaFunction::from_signature(signature, class.name.clone());
                if target.added {
                    let found = class
                        .find_function(&native.minimal_signature())
                        .filter(|f| f.is_user_added);
                    match found {
                        Some(f) => Some(f.clone()),
                        None => bail!(
                            "no added function '{}' on '{}'",
                            native.minimal_signature(),
                            class.name
                        ),
                    }
                } else {
                    Some(native)
                }
            }
        };
        Ok(Self { class, function })
    }

    fn plain_rules(&self) -> Vec<&DocModification> {
        match &self.function {
            Some(f) => function_doc_modifications(f, Some(&self.class)),
            None => class_doc_modifications(&self.class),
        }
    }

    fn xpath_rules(&self) -> Vec<&DocModification> {
        match &self.function {
            Some(f) => function_xpath_doc_modifications(f, Some(&self.class)),
            None => class_xpath_doc_modifications(&self.class),
        }
    }

    fn describe(&self) -> String {
        match &self.function {
            Some(f) => format!("{}::{}", self.class.name, f.minimal_signature()),
            None => self.class.name.clone(),
        }
    }
}

/// Run `tether doc rules`.
pub fn rules(typesystem: &Path, target: &Target, json: bool) -> Result<()> {
    let declaration = Declaration::resolve(typesystem, target)?;
    if json {
        println!("{}", rules_json(&declaration)?);
    } else {
        print!("{}", rules_text(&declaration));
    }
    Ok(())
}

fn rules_json(declaration: &Declaration) -> Result<String> {
    let json = serde_json::json!({
        "declaration": declaration.describe(),
        "plain": declaration.plain_rules(),
        "xpath": declaration.xpath_rules(),
    });
    Ok(serde_json::to_string_pretty(&json)?)
}

fn rules_text(declaration: &Declaration) -> String {
    let plain = declaration.plain_rules();
    let xpath = declaration.xpath_rules();
    let mut out = format!("{}\n", declaration.describe());
    if plain.is_empty() && xpath.is_empty() {
        out.push_str("  no documentation rules\n");
        return out;
    }
    for rule in plain {
        out.push_str(&format!("  {:?}: {}\n", rule.mode(), rule.code()));
    }
    for rule in xpath {
        out.push_str(&format!("  XpathReplace {}: {}\n", rule.xpath(), rule.code()));
    }
    out
}

/// Run `tether doc apply`.
pub fn apply(typesystem: &Path, target: &Target, input: &Path, output: Option<&Path>) -> Result<()> {
    let declaration = Declaration::resolve(typesystem, target)?;
    let xml = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;

    let rules = declaration.xpath_rules();
    let engine = XsltProc::new();
    if !rules.is_empty() && !engine.is_available() {
        bail!("xsltproc not found; run 'tether doctor'");
    }
    let result = apply_doc_modifications(&rules, &xml, &engine, &mut StderrSink);

    match output {
        Some(path) => {
            fs::write(path, &result).with_context(|| format!("writing {}", path.display()))?;
            println!(
                "Applied {} rules for {} → {}",
                rules.len(),
                declaration.describe(),
                path.display()
            );
        }
        None => println!("{result}"),
    }
    Ok(())
}
