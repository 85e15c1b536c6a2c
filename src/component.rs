//! Components: named views with a declared parameter signature,
//! called with positional arguments.

use std::{collections::HashMap, str::FromStr};

use anyhow::bail;
use kstring::KString;

use crate::{error::HtmlError, myfrom::MyFrom, value::Value, warn};

/// One declared parameter. `default` of `None` means no default was
/// declared; such parameters bind to "absent" when not given.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    pub name: KString,
    pub default: Option<Value>,
}

impl ParamDescriptor {
    pub fn bare<T>(name: T) -> Self
    where KString: MyFrom<T>
    {
        ParamDescriptor { name: KString::myfrom(name), default: None }
    }

    pub fn with_default<T>(name: T, default: impl Into<Value>) -> Self
    where KString: MyFrom<T>
    {
        ParamDescriptor { name: KString::myfrom(name), default: Some(default.into()) }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentSignature(Vec<ParamDescriptor>);

impl ComponentSignature {
    pub fn new(params: Vec<ParamDescriptor>) -> Self {
        ComponentSignature(params)
    }

    pub fn params(&self) -> &[ParamDescriptor] {
        &self.0
    }
}

impl<const N: usize> From<[ParamDescriptor; N]> for ComponentSignature {
    fn from(params: [ParamDescriptor; N]) -> Self {
        ComponentSignature(params.into())
    }
}

impl FromIterator<ParamDescriptor> for ComponentSignature {
    fn from_iter<I: IntoIterator<Item = ParamDescriptor>>(iter: I) -> Self {
        ComponentSignature(iter.into_iter().collect())
    }
}


/// When a declared default replaces the argument at the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// The argument is missing or empty for its kind (see
    /// `Value::is_empty`): null, false, 0, 0.0, "", "0", empty list
    /// or map.
    #[default]
    OnEmpty,
    /// Only when there is no argument at that position.
    OnAbsent,
}

impl FromStr for FallbackPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "empty" => Ok(FallbackPolicy::OnEmpty),
            "absent" => Ok(FallbackPolicy::OnAbsent),
            _ => bail!("invalid fallback policy {:?}, expecting \"empty\" or \"absent\"", s),
        }
    }
}


/// Bound component arguments, in signature order. A `None` value is
/// the absent marker (no argument, no default).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentData(Vec<(KString, Option<Value>)>);

impl ComponentData {
    pub fn new() -> Self {
        ComponentData(Vec::new())
    }

    /// Set `name`, replacing an earlier binding of the same name in
    /// place.
    pub fn insert(&mut self, name: KString, value: Option<Value>) {
        if let Some(entry) = self.0.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.0.push((name, value));
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(n, _)| n.as_str() == name)
    }

    /// The bound value; `None` if `name` is absent or not a parameter.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter()
            .find(|(n, _)| n.as_str() == name)
            .and_then(|(_, v)| v.as_ref())
    }

    pub fn is_absent(&self, name: &str) -> bool {
        self.contains(name) && self.get(name).is_none()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(KString, Option<Value>)> {
        self.0.iter()
    }
}

/// Bind positional `args` to the parameters of `signature`.
pub fn bind(signature: &ComponentSignature, args: &[Value], policy: FallbackPolicy)
            -> ComponentData
{
    let mut data = ComponentData::new();
    for (i, param) in signature.params().iter().enumerate() {
        let arg = match (args.get(i), policy) {
            (Some(arg), FallbackPolicy::OnAbsent) => Some(arg),
            (Some(arg), FallbackPolicy::OnEmpty) if !arg.is_empty() => Some(arg),
            _ => None,
        };
        let value = arg.or(param.default.as_ref()).cloned();
        data.insert(param.name.clone(), value);
    }
    data
}


#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub view: KString,
    pub signature: ComponentSignature,
}

/// Component name -> (view name, signature). Entries are replaced on
/// re-registration, never removed.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: HashMap<KString, Component>,
    policy: FallbackPolicy,
}

impl ComponentRegistry {
    pub fn new(policy: FallbackPolicy) -> Self {
        ComponentRegistry { components: HashMap::new(), policy }
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: FallbackPolicy) {
        self.policy = policy;
    }

    pub fn register<N, V>(&mut self, name: N, view: V, signature: ComponentSignature)
    where KString: MyFrom<N> + MyFrom<V>
    {
        let name = KString::myfrom(name);
        let component = Component { view: KString::myfrom(view), signature };
        if let Some(old) = self.components.insert(name.clone(), component) {
            warn!("component {:?} registered again, replacing view {:?}", name, old.view);
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &KString> {
        self.components.keys()
    }

    /// Look up `name` and bind `args` against its signature. Fails
    /// with `ComponentNotFound` before any binding is done.
    pub fn resolve(&self, name: &str, args: &[Value])
                   -> Result<(&KString, ComponentData), HtmlError>
    {
        let component = self.get(name).ok_or_else(
            || HtmlError::ComponentNotFound(KString::from_ref(name)))?;
        Ok((&component.view, bind(&component.signature, args, self.policy)))
    }
}
