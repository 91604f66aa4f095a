//! The workspace: every object a session can address.

use std::collections::BTreeMap;

use gplot_core::{EvalError, Evaluator};
use gplot_expr::{Function, Namespace, Scope, evaluate_str, is_reserved};
use gplot_props::{PropertyInfo, Reflect, render_table};
use tracing::{debug, trace};

use crate::error::ModelError;
use crate::graph::{Graph, Sample};
use crate::parameter::Parameter;
use crate::path::{PropertyPath, Target};
use crate::settings::PlotSettings;

/// Names visible to expressions: parameters as variables, namespace
/// functions as functions.
#[derive(Clone, Copy)]
pub struct Symbols<'a> {
    parameters: &'a BTreeMap<String, Parameter>,
    namespace: &'a Namespace,
}

impl Scope for Symbols<'_> {
    fn variable(&self, name: &str) -> Option<f64> {
        self.parameters.get(name).map(|p| p.value)
    }

    fn function(&self, name: &str, arity: usize) -> Option<&Function> {
        self.namespace.find(name, arity)
    }

    fn arities(&self, name: &str) -> Vec<usize> {
        self.namespace.arities(name)
    }
}

impl Evaluator for Symbols<'_> {
    fn evaluate(&self, text: &str) -> Result<f64, EvalError> {
        evaluate_str(text, self)
    }
}

/// Plot settings, graphs, parameters and user functions.
///
/// All text-level access goes through [`PropertyPath`]s:
///
/// ```ignore
/// ws.set("grid", "full")?;       // plot settings
/// ws.set("1.width", "2")?;       // first graph
/// ws.set("a.step", "0.5")?;      // parameter `a`
/// ```
#[derive(Clone, Debug, Default)]
pub struct Workspace {
    settings: PlotSettings,
    graphs: Vec<Graph>,
    parameters: BTreeMap<String, Parameter>,
    namespace: Namespace,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> &PlotSettings {
        &self.settings
    }

    pub fn graphs(&self) -> &[Graph] {
        &self.graphs
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.values()
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn symbols(&self) -> Symbols<'_> {
        Symbols {
            parameters: &self.parameters,
            namespace: &self.namespace,
        }
    }

    pub fn eval(&self, text: &str) -> Result<f64, ModelError> {
        Ok(self.symbols().evaluate(text)?)
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    pub fn get(&self, path: &str) -> Result<String, ModelError> {
        let path = PropertyPath::parse(path)?;
        Ok(match &path.target {
            Target::Plot => self.settings.get_property(&path.name)?,
            Target::Graph(index) => self.graph(*index)?.get_property(&path.name)?,
            Target::Parameter(owner) => self.named(owner)?.get_property(&path.name)?,
        })
    }

    /// Set a property. On error nothing changes.
    pub fn set(&mut self, path: &str, text: &str) -> Result<(), ModelError> {
        let path = PropertyPath::parse(path)?;
        trace!(%path, value = text, "set property");
        let symbols = Symbols {
            parameters: &self.parameters,
            namespace: &self.namespace,
        };
        match path.target {
            Target::Plot => self.settings.set_property(&path.name, text, &symbols)?,
            Target::Graph(index) => {
                let slot = graph_slot(index, self.graphs.len())?;
                self.graphs[slot].set_property(&path.name, text, &symbols)?;
            }
            Target::Parameter(owner) => {
                // The value may refer to the parameter itself, so edit a copy.
                let mut parameter = self.named(&owner)?.clone();
                parameter.set_property(&path.name, text, &self.symbols())?;
                self.parameters.insert(owner, parameter);
            }
        }
        Ok(())
    }

    /// Accepted values of an enumerated property, `None` when free-form.
    pub fn values(&self, path: &str) -> Result<Option<Vec<String>>, ModelError> {
        let path = PropertyPath::parse(path)?;
        Ok(match &path.target {
            Target::Plot => self.settings.property_values(&path.name)?,
            Target::Graph(index) => self.graph(*index)?.property_values(&path.name)?,
            Target::Parameter(owner) => self.named(owner)?.property_values(&path.name)?,
        })
    }

    /// Every property of `target`, hidden ones included.
    pub fn list(&self, target: &str) -> Result<Vec<PropertyInfo>, ModelError> {
        Ok(match Target::parse(target)? {
            Target::Plot => self.settings.list_properties(),
            Target::Graph(index) => self.graph(index)?.list_properties(),
            Target::Parameter(owner) => self.named(&owner)?.list_properties(),
        })
    }

    /// Aligned listing of the visible properties of `target`.
    pub fn print(&self, target: &str) -> Result<Vec<String>, ModelError> {
        let visible: Vec<_> = self
            .list(target)?
            .into_iter()
            .filter(|info| info.visible)
            .collect();
        Ok(render_table(&visible))
    }

    /// `lhs = rhs`: set a property if `lhs` names one, otherwise define or
    /// update the parameter `lhs`.
    pub fn assign(&mut self, lhs: &str, rhs: &str) -> Result<(), ModelError> {
        let path = PropertyPath::parse(lhs)?;
        if path.target == Target::Plot && !self.settings.has_property(&path.name) {
            self.define_parameter(&path.name, rhs)?;
            return Ok(());
        }
        self.set(lhs, rhs)
    }

    // ------------------------------------------------------------------
    // Definitions
    // ------------------------------------------------------------------

    /// Define `name = value`, or update the value of an existing parameter.
    pub fn define_parameter(&mut self, name: &str, text: &str) -> Result<f64, ModelError> {
        if is_reserved(name) {
            return Err(gplot_expr::NamespaceError::Reserved(name.to_string()).into());
        }
        let value = self.eval(text)?;
        match self.parameters.get_mut(name) {
            Some(parameter) => parameter.value = value,
            None => {
                self.parameters
                    .insert(name.to_string(), Parameter::new(name, value));
            }
        }
        debug!(name, value, "define parameter");
        Ok(value)
    }

    /// Define `name(params) = body`; returns the definition as stored.
    pub fn define_function(
        &mut self,
        name: &str,
        params: Vec<String>,
        body: &str,
    ) -> Result<String, ModelError> {
        Ok(self.namespace.define(name, params, body)?.to_string())
    }

    /// Remove a definition. Arity 0 removes a parameter, or failing that a
    /// zero-argument function.
    pub fn undefine(&mut self, name: &str, arity: i64) -> Result<(), ModelError> {
        let not_found = || ModelError::NotFound(name.to_string());
        let arity = usize::try_from(arity).map_err(|_| not_found())?;
        if arity == 0 && self.parameters.remove(name).is_some() {
            debug!(name, "undefine parameter");
            return Ok(());
        }
        self.namespace.remove(name, arity).ok_or_else(not_found)?;
        debug!(name, arity, "undefine function");
        Ok(())
    }

    /// `a = 2` for each parameter, then each function definition.
    pub fn definitions(&self) -> Vec<String> {
        let parameters = self.parameters.values().map(|p| {
            format!("{} = {}", p.name(), gplot_core::format_number(p.value))
        });
        let functions = self.namespace.iter().map(Function::to_string);
        parameters.chain(functions).collect()
    }

    // ------------------------------------------------------------------
    // Graphs
    // ------------------------------------------------------------------

    /// Add a graph; returns its 1-based index.
    pub fn add_graph(&mut self, source: &str) -> Result<usize, ModelError> {
        let graph = Graph::new(source)?;
        self.graphs.push(graph);
        debug!(index = self.graphs.len(), source, "add graph");
        Ok(self.graphs.len())
    }

    pub fn graph(&self, index: i64) -> Result<&Graph, ModelError> {
        let slot = graph_slot(index, self.graphs.len())?;
        Ok(&self.graphs[slot])
    }

    pub fn delete_graph(&mut self, index: i64) -> Result<Graph, ModelError> {
        let slot = graph_slot(index, self.graphs.len())?;
        let graph = self.graphs.remove(slot);
        debug!(index, source = graph.source(), "delete graph");
        Ok(graph)
    }

    pub fn sample(
        &self,
        index: i64,
        from: f64,
        to: f64,
        count: i64,
    ) -> Result<Vec<Sample>, ModelError> {
        self.graph(index)?
            .sample(&self.symbols(), from, to, count)
    }

    /// Forget everything.
    pub fn reset(&mut self) {
        *self = Self::default();
        debug!("workspace reset");
    }

    fn named(&self, name: &str) -> Result<&Parameter, ModelError> {
        self.parameters
            .get(name)
            .ok_or_else(|| ModelError::UnknownTarget(name.to_string()))
    }
}

impl Evaluator for Workspace {
    fn evaluate(&self, text: &str) -> Result<f64, EvalError> {
        self.symbols().evaluate(text)
    }
}

/// 0-based slot of the 1-based graph `index`.
fn graph_slot(index: i64, count: usize) -> Result<usize, ModelError> {
    usize::try_from(index)
        .ok()
        .filter(|i| (1..=count).contains(i))
        .map(|i| i - 1)
        .ok_or(ModelError::GraphIndex { index, count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gplot_expr::NamespaceError;
    use gplot_props::PropertyError;

    #[test]
    fn plot_properties_by_path() {
        let mut ws = Workspace::new();
        ws.set("fog", "50%").unwrap();
        assert_eq!(ws.get("fog").unwrap(), "50%");
        assert_eq!(
            ws.get("fgo"),
            Err(ModelError::Property(PropertyError::Unknown("fgo".to_string())))
        );
    }

    #[test]
    fn real_properties_see_parameters_and_functions() {
        let mut ws = Workspace::new();
        ws.define_parameter("a", "2").unwrap();
        ws.define_function("sq", vec!["u".to_string()], "u*u").unwrap();
        ws.set("line_width", "sq(a)+0.5").unwrap();
        assert_eq!(ws.get("line_width").unwrap(), "4.5");
    }

    #[test]
    fn graph_paths_are_one_based() {
        let mut ws = Workspace::new();
        assert_eq!(ws.add_graph("sin(x)").unwrap(), 1);
        assert_eq!(ws.add_graph("cos(x)").unwrap(), 2);
        ws.set("2.width", "3").unwrap();
        assert_eq!(ws.get("2.width").unwrap(), "3");
        assert_eq!(ws.get("1.width").unwrap(), "1");
        assert_eq!(
            ws.get("3.width"),
            Err(ModelError::GraphIndex { index: 3, count: 2 })
        );
        assert!(ws.get("0.width").is_err());
    }

    #[test]
    fn huge_graph_indices_never_wrap() {
        let mut ws = Workspace::new();
        ws.add_graph("x").unwrap();
        assert_eq!(
            ws.get("9223372036854775807.width"),
            Err(ModelError::GraphIndex {
                index: i64::MAX,
                count: 1
            })
        );
        let path = "18446744073709551615.width";
        assert_eq!(ws.get(path), Err(ModelError::InvalidPath(path.to_string())));
        assert!(ws.set(path, "2").is_err());
        assert!(ws.list("18446744073709551615").is_err());
        assert_eq!(ws.get("1.width").unwrap(), "1");
    }

    #[test]
    fn parameter_paths() {
        let mut ws = Workspace::new();
        ws.assign("a", "1").unwrap();
        ws.set("a.step", "0.25").unwrap();
        ws.set("a.value", "a+1").unwrap();
        assert_eq!(ws.get("a.value").unwrap(), "2");
        assert_eq!(ws.get("a.step").unwrap(), "0.25");
        assert_eq!(
            ws.get("b.value"),
            Err(ModelError::UnknownTarget("b".to_string()))
        );
    }

    #[test]
    fn assign_prefers_properties() {
        let mut ws = Workspace::new();
        ws.assign("grid", "full").unwrap();
        assert_eq!(ws.get("grid").unwrap(), "full");
        assert!(ws.parameter("grid").is_none());

        ws.assign("k", "pi/2").unwrap();
        assert_eq!(ws.eval("2*k").unwrap(), std::f64::consts::PI);
        assert_eq!(
            ws.assign("x", "1"),
            Err(ModelError::Namespace(NamespaceError::Reserved("x".to_string())))
        );
    }

    #[test]
    fn failed_set_leaves_state() {
        let mut ws = Workspace::new();
        ws.assign("a", "1").unwrap();
        assert!(ws.set("a.step", "-1").is_err());
        assert!(ws.set("xrange", "[0;nope]").is_err());
        assert_eq!(ws.get("a.step").unwrap(), "0.1");
        assert_eq!(ws.get("xrange").unwrap(), "[-10;10]");
    }

    #[test]
    fn listing_targets() {
        let mut ws = Workspace::new();
        ws.add_graph("x").unwrap();
        let all = ws.list("").unwrap();
        assert!(all.iter().any(|i| i.name == "fog" && !i.visible));
        let printed = ws.print("").unwrap();
        assert!(printed.iter().all(|line| !line.starts_with("fog")));
        assert!(ws.print("1").unwrap()[0].starts_with("expr"));
        assert!(ws.list("zz").is_err());
    }

    #[test]
    fn values_of_enumerations() {
        let mut ws = Workspace::new();
        ws.add_graph("x").unwrap();
        assert_eq!(
            ws.values("1.style").unwrap(),
            Some(vec![
                "lines".to_string(),
                "points".to_string(),
                "surface".to_string()
            ])
        );
        assert_eq!(ws.values("title").unwrap(), None);
    }

    #[test]
    fn definitions_and_undefine() {
        let mut ws = Workspace::new();
        ws.define_parameter("a", "3").unwrap();
        ws.define_function("f", vec!["x".to_string()], "a*x").unwrap();
        assert_eq!(ws.definitions(), ["a = 3", "f(x) = a*x"]);

        ws.undefine("f", 1).unwrap();
        ws.undefine("a", 0).unwrap();
        assert!(ws.definitions().is_empty());
        assert_eq!(
            ws.undefine("a", 0),
            Err(ModelError::NotFound("a".to_string()))
        );
    }

    #[test]
    fn sample_through_workspace() {
        let mut ws = Workspace::new();
        ws.define_parameter("a", "2").unwrap();
        ws.add_graph("a*x").unwrap();
        let samples = ws.sample(1, 0.0, 1.0, 2).unwrap();
        assert_eq!(samples[1].value, Some(2.0));
    }

    #[test]
    fn delete_and_reset() {
        let mut ws = Workspace::new();
        ws.add_graph("x").unwrap();
        ws.add_graph("x^2").unwrap();
        assert_eq!(ws.delete_graph(1).unwrap().source(), "x");
        assert_eq!(ws.graphs()[0].source(), "x^2");

        ws.set("grid", "off").unwrap();
        ws.reset();
        assert!(ws.graphs().is_empty());
        assert_eq!(ws.get("grid").unwrap(), "on");
    }
}
