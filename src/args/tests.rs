use std::rc::Rc;

use super::*;
use crate::compiler::{Expr, ExprNode, RawExprHandle, SlotId};

/// A buffer-like object missing parts of the array facade.
struct Facade {
    dtype: Option<&'static str>,
    shape: Option<Vec<usize>>,
}

impl ArrayLike for Facade {
    fn dtype_name(&self) -> Option<&str> {
        self.dtype
    }

    fn shape(&self) -> Option<&[usize]> {
        self.shape.as_deref()
    }

    fn as_bytes(&self) -> &[u8] {
        &[]
    }
}

fn defaults() -> TypeDefaults {
    TypeDefaults::default()
}

fn load_expr() -> Expr {
    Expr::new(ExprNode::ArgLoad {
        slot: SlotId(0),
        dtype: PrimitiveType::I32,
    })
}

// --- Scalar ---

#[test]
fn test_scalar_round_trips_every_type() {
    let samples = [
        Value::I8(-3),
        Value::I16(1234),
        Value::I32(7),
        Value::I64(-9_000_000_000),
        Value::U8(250),
        Value::U16(65535),
        Value::U32(3_000_000_000),
        Value::U64(u64::MAX),
        Value::F32(0.5),
        Value::F64(-1.25e-8),
    ];
    for v in samples {
        let arg = ScalarArg::new(v.dtype(), &defaults()).unwrap();
        assert_eq!(arg.extract(&KernelArg::Scalar(v)).unwrap(), v);
    }
}

#[test]
fn test_scalar_converts_to_declared_type() {
    let arg = ScalarArg::new("float", &defaults()).unwrap();
    assert_eq!(arg.dtype(), PrimitiveType::F32);
    assert_eq!(
        arg.extract(&KernelArg::scalar(3i32)).unwrap(),
        Value::F32(3.0)
    );
}

#[test]
fn test_scalar_rejects_unknown_dtype() {
    assert!(matches!(
        ScalarArg::new("bool", &defaults()),
        Err(ArgError::UnsupportedType(_))
    ));
}

#[test]
fn test_scalar_rejects_array() {
    let a = HostArray::from_vec(vec![1.0f32]);
    let arg = ScalarArg::new(PrimitiveType::F32, &defaults()).unwrap();
    match arg.extract(&KernelArg::array(&a)) {
        Err(ArgError::ArgumentMismatch {
            expected, found, ..
        }) => {
            assert_eq!(expected, "scalar");
            assert_eq!(found, "array");
        }
        other => panic!("expected mismatch, got {:?}", other),
    }
}

// --- External array ---

#[test]
fn test_ext_arr_dimension_boundaries() {
    assert!(ExternalArray::new(1).is_ok());
    assert!(matches!(
        ExternalArray::new(0),
        Err(ArgError::UnsupportedDimension(0))
    ));
    assert!(matches!(
        ExternalArray::new(2),
        Err(ArgError::UnsupportedDimension(2))
    ));
    assert_eq!(ExternalArray::default().dim(), 1);
}

#[test]
fn test_ext_arr_extracts_dtype_and_rank() {
    let a = HostArray::from_slice(&[0.0f32; 10], &[10]).unwrap();
    let info = ExternalArray::new(1)
        .unwrap()
        .extract(&KernelArg::array(&a))
        .unwrap();
    assert_eq!(
        info,
        ArrayInfo {
            dtype: PrimitiveType::F32,
            rank: 1
        }
    );
}

#[test]
fn test_ext_arr_reports_buffer_rank() {
    let a = HostArray::from_slice(&[0i64; 6], &[2, 3]).unwrap();
    let info = ExternalArray::default()
        .extract(&KernelArg::array(&a))
        .unwrap();
    assert_eq!(info.rank, 2);
    assert_eq!(info.dtype, PrimitiveType::I64);
}

#[test]
fn test_ext_arr_foreign_dtype_names() {
    let f = Facade {
        dtype: Some("uint8"),
        shape: Some(vec![4]),
    };
    let info = ExternalArray::default()
        .extract(&KernelArg::array(&f))
        .unwrap();
    assert_eq!(info.dtype, PrimitiveType::U8);

    let f = Facade {
        dtype: Some("bool"),
        shape: Some(vec![4]),
    };
    assert!(matches!(
        ExternalArray::default().extract(&KernelArg::array(&f)),
        Err(ArgError::UnsupportedType(_))
    ));
}

#[test]
fn test_ext_arr_without_shape_is_invalid() {
    let f = Facade {
        dtype: Some("f32"),
        shape: None,
    };
    assert!(matches!(
        ExternalArray::default().extract(&KernelArg::array(&f)),
        Err(ArgError::InvalidBuffer(_))
    ));
    let f = Facade {
        dtype: None,
        shape: Some(vec![1]),
    };
    assert!(matches!(
        ExternalArray::default().extract(&KernelArg::array(&f)),
        Err(ArgError::InvalidBuffer(_))
    ));
}

#[test]
fn test_ext_arr_rejects_scalar() {
    assert!(matches!(
        ExternalArray::default().extract(&KernelArg::scalar(1.0f64)),
        Err(ArgError::InvalidBuffer(_))
    ));
}

// --- Template ---

#[test]
fn test_template_identity_fallback() {
    let t = Template::new();
    assert_eq!(
        t.extract(&KernelArg::scalar(5i32)).unwrap(),
        TemplateValue::Value(Value::I32(5))
    );
    let five = TemplateArg::Value(Value::I64(5));
    assert_eq!(
        t.extract(&KernelArg::template(&five)).unwrap(),
        TemplateValue::Value(Value::I64(5))
    );
}

#[test]
fn test_template_opaque_keeps_identity() {
    let obj = TemplateArg::opaque(String::from("scene"));
    let TemplateArg::Opaque(rc) = &obj else {
        unreachable!()
    };
    match Template::new().extract(&KernelArg::template(&obj)).unwrap() {
        TemplateValue::Opaque(out) => {
            assert!(Rc::ptr_eq(rc, &out));
            assert_eq!(out.downcast_ref::<String>().unwrap(), "scene");
        }
        other => panic!("expected opaque, got {:?}", other),
    }
}

#[test]
fn test_template_snode_yields_handle() {
    let snode = TemplateArg::from(SNodeRef {
        id: 3,
        ptr: NativeHandle(0xdead_0000),
    });
    assert_eq!(
        snode.extract(),
        TemplateValue::Handle(NativeHandle(0xdead_0000))
    );
}

#[test]
fn test_template_expr_yields_node_address() {
    let e = load_expr();
    let addr = e.address();
    assert_eq!(
        TemplateArg::from(e).extract(),
        TemplateValue::Address(addr)
    );
    assert_eq!(
        TemplateArg::from(RawExprHandle(0x1000)).extract(),
        TemplateValue::Address(0x1000)
    );
}

#[test]
fn test_template_tuple_recurses() {
    let e = load_expr();
    let inner = TemplateArg::tuple([TemplateArg::from(Value::I32(1)), TemplateArg::from(e.clone())]);
    let outer = TemplateArg::tuple([
        TemplateArg::from(SNodeRef {
            id: 0,
            ptr: NativeHandle(8),
        }),
        inner,
    ]);
    assert_eq!(
        Template::new().extract(&KernelArg::template(&outer)).unwrap(),
        TemplateValue::Tuple(vec![
            TemplateValue::Handle(NativeHandle(8)),
            TemplateValue::Tuple(vec![
                TemplateValue::Value(Value::I32(1)),
                TemplateValue::Address(e.address()),
            ]),
        ])
    );
}

#[test]
fn test_template_empty_tuple() {
    assert_eq!(
        TemplateArg::Tuple(Vec::new()).extract(),
        TemplateValue::Tuple(Vec::new())
    );
}

#[test]
fn test_template_passes_array_through() {
    let a = HostArray::from_vec(vec![1u8, 2]);
    let v = Template::new().extract(&KernelArg::array(&a)).unwrap();
    assert_eq!(
        v,
        TemplateValue::Array {
            address: a.as_bytes().as_ptr() as usize,
            byte_len: 2
        }
    );

    let b = HostArray::from_vec(vec![1u8, 2]);
    assert_ne!(v, Template::new().extract(&KernelArg::array(&b)).unwrap());
}

#[test]
fn test_template_bound_object() {
    let t = Template::bound_to(TemplateArg::from(Value::U8(1)), Some(2));
    assert!(matches!(t.bound(), Some(TemplateArg::Value(Value::U8(1)))));
    assert_eq!(t.dim(), Some(2));
    assert!(Template::new().bound().is_none());
}

// --- ArgKind ---

#[test]
fn test_arg_kind_dispatch_and_display() {
    let a = HostArray::from_vec(vec![0.0f64; 3]);
    let kinds = [
        ArgKind::scalar(PrimitiveType::I32, &defaults()).unwrap(),
        ArgKind::ext_arr(1).unwrap(),
        ArgKind::template(),
    ];
    let args = [
        KernelArg::scalar(2i32),
        KernelArg::array(&a),
        KernelArg::scalar(9u8),
    ];
    let out: Vec<_> = kinds
        .iter()
        .zip(args.iter())
        .map(|(k, x)| k.extract(x).unwrap())
        .collect();
    assert_eq!(out[0], Extracted::Scalar(Value::I32(2)));
    assert_eq!(
        out[1],
        Extracted::ExternalArray(ArrayInfo {
            dtype: PrimitiveType::F64,
            rank: 1
        })
    );
    assert_eq!(out[2], Extracted::Template(TemplateValue::Value(Value::U8(9))));

    let rendered: Vec<_> = kinds.iter().map(|k| k.to_string()).collect();
    assert_eq!(rendered, ["i32", "ext_arr(dim=1)", "template"]);
    assert!(kinds[0].is_declared());
    assert!(kinds[1].is_declared());
    assert!(!kinds[2].is_declared());
}

// --- HostArray ---

#[test]
fn test_host_array_views() {
    let mut a = HostArray::from_slice(&[1i16, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
    assert_eq!(a.len(), 6);
    assert_eq!(a.as_bytes().len(), 12);
    assert_eq!(a.as_slice::<i16>().unwrap(), &[1, 2, 3, 4, 5, 6]);
    assert!(a.as_slice::<u16>().is_none());
    a.as_mut_slice::<i16>().unwrap()[5] = -1;
    assert_eq!(a.as_slice::<i16>().unwrap()[5], -1);
    assert_eq!(&a.as_bytes()[10..12], &(-1i16).to_ne_bytes());
}

#[test]
fn test_host_array_shape_mismatch() {
    assert!(matches!(
        HostArray::from_slice(&[1u32, 2, 3], &[2, 2]),
        Err(ArgError::InvalidBuffer(_))
    ));
}

#[test]
fn test_host_array_zeros() {
    let a = HostArray::zeros(PrimitiveType::F64, &[0]).unwrap();
    assert!(a.is_empty());
    assert!(a.as_bytes().is_empty());
    assert_eq!(a.shape(), Some(&[0usize][..]));
}

#[test]
fn test_host_array_shape_overflow() {
    assert!(matches!(
        HostArray::from_slice::<u8>(&[], &[usize::MAX, 2]),
        Err(ArgError::InvalidBuffer(_))
    ));
    assert!(matches!(
        HostArray::zeros(PrimitiveType::F64, &[usize::MAX / 4]),
        Err(ArgError::InvalidBuffer(_))
    ));
    assert_eq!(HostArray::zeros(PrimitiveType::U8, &[]).unwrap().len(), 1);
}
